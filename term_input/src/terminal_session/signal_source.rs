// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{SignalKind, StopSignal, StopSwitch};
use tokio::sync::mpsc::{Receiver, Sender, channel};

/// Bound of the signal queue. Signals coalesce at the OS level anyway, so a backlog this
/// long only happens when the listener isn't running.
pub const SIGNAL_CHANNEL_CAPACITY: usize = 32;

/// Where the signal listener gets its signals from. Fed by the forwarder thread (see
/// [`spawn_os_signal_source`]) or by a [`SignalSender`] in tests.
///
/// [`spawn_os_signal_source`]: crate::spawn_os_signal_source
#[derive(Debug)]
pub struct SignalSource {
    receiver: Receiver<SignalKind>,
    stop_signal: StopSignal,
}

#[derive(Debug, Clone)]
pub struct SignalSender {
    sender: Sender<SignalKind>,
}

/// Stops a [`SignalSource`], from any thread.
#[derive(Debug, Clone)]
pub struct SignalStopper {
    stop_switch: StopSwitch,
}

impl SignalSource {
    #[must_use]
    pub fn channel() -> (SignalSource, SignalSender, SignalStopper) {
        let (sender, receiver) = channel(SIGNAL_CHANNEL_CAPACITY);
        let (stop_switch, stop_signal) = StopSwitch::new();
        let source = SignalSource {
            receiver,
            stop_signal,
        };
        (source, SignalSender { sender }, SignalStopper { stop_switch })
    }

    /// Next signal. Returns `None` once stopped (queued signals are discarded), or once
    /// every sender is gone and the queue is drained. Cancel safe.
    pub async fn recv(&mut self) -> Option<SignalKind> {
        if self.stop_signal.is_stopped() {
            return None;
        }
        tokio::select! {
            biased;
            () = self.stop_signal.stopped() => None,
            maybe_signal = self.receiver.recv() => maybe_signal,
        }
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool { self.stop_signal.is_stopped() }
}

impl SignalSender {
    /// Returns `false` if the source is gone.
    pub async fn send(&self, signal: SignalKind) -> bool {
        self.sender.send(signal).await.is_ok()
    }

    /// For use outside of the runtime (the forwarder thread). Blocks while the queue is
    /// full.
    ///
    /// # Panics
    ///
    /// If called from inside an async context.
    pub fn blocking_send(&self, signal: SignalKind) -> bool {
        self.sender.blocking_send(signal).is_ok()
    }
}

impl SignalStopper {
    /// `hook` runs exactly once, on the first [`Self::stop`].
    #[must_use]
    pub fn with_on_stop(self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            stop_switch: self.stop_switch.with_on_flip(hook),
        }
    }

    /// Idempotent. Returns `true` if this call stopped the source.
    pub fn stop(&self) -> bool { self.stop_switch.flip() }

    #[must_use]
    pub fn is_stopped(&self) -> bool { self.stop_switch.is_flipped() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[tokio::test]
    async fn test_signals_in_order_then_end() {
        let (mut source, sender, _stopper) = SignalSource::channel();
        assert!(sender.send(SignalKind::WindowChanged).await);
        assert!(sender.send(SignalKind::Other(10)).await);
        drop(sender);

        assert_eq!(source.recv().await, Some(SignalKind::WindowChanged));
        assert_eq!(source.recv().await, Some(SignalKind::Other(10)));
        assert_eq!(source.recv().await, None);
    }

    #[tokio::test]
    async fn test_stop_unblocks_recv() {
        let (mut source, _sender, stopper) = SignalSource::channel();
        let listener = tokio::spawn(async move { source.recv().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(stopper.stop());
        assert!(!stopper.stop());
        assert_eq!(listener.await.unwrap(), None);
    }

    #[test]
    fn test_blocking_send_from_a_plain_thread() {
        let (mut source, sender, _stopper) = SignalSource::channel();
        std::thread::spawn(move || assert!(sender.blocking_send(SignalKind::Other(2))))
            .join()
            .unwrap();
        assert_eq!(source.receiver.try_recv().ok(), Some(SignalKind::Other(2)));
    }
}
