// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt, sync::Arc};
use tokio::sync::watch;

type OnFlipHook = Arc<dyn Fn() + Send + Sync>;

/// One shot, thread safe "please stop" switch, shared by the input and signal sources.
///
/// - [`StopSwitch::flip`] can be called from any thread, any number of times. Only the
///   first call flips it, and only that call runs the `on_flip` hook (used to wake up a
///   helper thread that is parked in `mio::Poll::poll`).
/// - [`StopSignal::stopped`] resolves once the switch is flipped. If every [`StopSwitch`]
///   is dropped without flipping, it never resolves.
#[derive(Clone)]
pub struct StopSwitch {
    sender: Arc<watch::Sender<bool>>,
    on_flip: Option<OnFlipHook>,
}

/// The receiving side of a [`StopSwitch`].
#[derive(Debug, Clone)]
pub struct StopSignal {
    receiver: watch::Receiver<bool>,
}

impl StopSwitch {
    #[must_use]
    pub fn new() -> (StopSwitch, StopSignal) {
        let (sender, receiver) = watch::channel(false);
        let switch = StopSwitch {
            sender: Arc::new(sender),
            on_flip: None,
        };
        (switch, StopSignal { receiver })
    }

    /// Run `hook` when the switch is flipped. Replaces any previous hook.
    #[must_use]
    pub fn with_on_flip(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_flip = Some(Arc::new(hook));
        self
    }

    /// Returns `true` if this call flipped the switch.
    pub fn flip(&self) -> bool {
        let did_flip = self.sender.send_if_modified(|is_flipped| {
            if *is_flipped {
                false
            } else {
                *is_flipped = true;
                true
            }
        });
        if did_flip && let Some(hook) = &self.on_flip {
            hook();
        }
        did_flip
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool { *self.sender.borrow() }
}

impl fmt::Debug for StopSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopSwitch")
            .field("is_flipped", &self.is_flipped())
            .field("has_on_flip", &self.on_flip.is_some())
            .finish()
    }
}

impl StopSignal {
    #[must_use]
    pub fn is_stopped(&self) -> bool { *self.receiver.borrow() }

    /// Cancel safe.
    pub async fn stopped(&mut self) {
        if self.receiver.wait_for(|is_flipped| *is_flipped).await.is_err() {
            // Every switch is gone and none of them was flipped.
            std::future::pending::<()>().await;
        }
    }
}
