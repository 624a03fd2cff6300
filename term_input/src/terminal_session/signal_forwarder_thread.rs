// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words EINTR SIGWINCH SIGUSR

//! Dedicated thread that forwards OS signals into a [`SignalSource`].
//!
//! The signal handler that [`signal_hook`] installs only writes to a self pipe. This
//! thread polls that pipe (via [`signal_hook_mio::v1_0::Signals`]) together with a
//! [`mio::Waker`] that [`SignalStopper::stop`] uses to end it, and does the rest outside
//! of signal context.

use crate::{Continuation, DEBUG_TERM_INPUT_SHOW_PIPELINE, SignalKind, SignalSender,
            SignalSource, SignalStopper, TerminalSessionError};
use mio::{Events, Interest, Poll, Token, Waker};
use signal_hook::consts::{FORBIDDEN, SIGWINCH};
use signal_hook_mio::v1_0::Signals;
use std::{io::ErrorKind, sync::Arc};

pub const SIGNALS_TOKEN: Token = Token(0);
pub const SIGNAL_WAKER_TOKEN: Token = Token(1);
const EVENTS_CAPACITY: usize = 8;

impl SignalKind {
    #[must_use]
    pub fn from_signal_number(signal_number: i32) -> Self {
        if signal_number == SIGWINCH {
            Self::WindowChanged
        } else {
            Self::Other(signal_number)
        }
    }
}

/// Spawn the forwarder thread for `SIGWINCH` plus `extra_signals`.
///
/// # Errors
///
/// Returns [`TerminalSessionError::SpawnFailed`] if a signal can't be hooked (for
/// example `SIGKILL`), or if polling or the thread can't be set up.
pub fn spawn_os_signal_source(
    extra_signals: &[i32],
) -> Result<(SignalSource, SignalStopper), TerminalSessionError> {
    if let Some(signal_number) = extra_signals.iter().find(|it| FORBIDDEN.contains(*it)) {
        return Err(TerminalSessionError::spawn_failed(
            "signal handlers",
            std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("signal {signal_number} can't be hooked"),
            ),
        ));
    }

    let poll_handle = Poll::new()
        .map_err(|error| TerminalSessionError::spawn_failed("signal poll", error))?;

    let signal_numbers = std::iter::once(SIGWINCH).chain(extra_signals.iter().copied());
    let mut signals = Signals::new(signal_numbers)
        .map_err(|error| TerminalSessionError::spawn_failed("signal handlers", error))?;

    poll_handle
        .registry()
        .register(&mut signals, SIGNALS_TOKEN, Interest::READABLE)
        .map_err(|error| TerminalSessionError::spawn_failed("signal poll", error))?;

    let waker = Arc::new(
        Waker::new(poll_handle.registry(), SIGNAL_WAKER_TOKEN)
            .map_err(|error| TerminalSessionError::spawn_failed("signal poll", error))?,
    );

    let (source, sender, stopper) = SignalSource::channel();
    let stopper = stopper.with_on_stop(move || {
        if let Err(error) = waker.wake() {
            tracing::warn!(message = "signal-forwarder-thread: wake failed", ?error);
        }
    });

    let mut forwarder_thread = SignalForwarderThread {
        poll_handle,
        ready_events_buffer: Events::with_capacity(EVENTS_CAPACITY),
        signals,
        sender,
        stopper: stopper.clone(),
    };

    std::thread::Builder::new()
        .name("term-input-signals".into())
        .spawn(move || forwarder_thread.start())
        .map_err(|error| {
            TerminalSessionError::spawn_failed("signal forwarder thread", error)
        })?;

    DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
        tracing::debug!(message = "signal-forwarder-thread: spawned", ?extra_signals);
    });

    Ok((source, stopper))
}

#[allow(missing_debug_implementations)]
pub struct SignalForwarderThread {
    poll_handle: Poll,
    ready_events_buffer: Events,
    signals: Signals,
    sender: SignalSender,
    stopper: SignalStopper,
}

impl Drop for SignalForwarderThread {
    fn drop(&mut self) {
        DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
            tracing::debug!(message = "signal-forwarder-thread: exiting");
        });
    }
}

impl SignalForwarderThread {
    pub fn start(&mut self) {
        loop {
            if let Err(error) = self.poll_handle.poll(&mut self.ready_events_buffer, None) {
                if error.kind() == ErrorKind::Interrupted {
                    continue;
                }
                tracing::warn!(message = "signal-forwarder-thread: poll error", ?error);
                return;
            }

            // Breaks the borrow so the handlers can use `&mut self`.
            let ready_tokens: Vec<Token> = self
                .ready_events_buffer
                .iter()
                .map(mio::event::Event::token)
                .collect();

            for token in ready_tokens {
                let continuation = match token {
                    SIGNAL_WAKER_TOKEN if self.stopper.is_stopped() => Continuation::Stop,
                    SIGNALS_TOKEN => self.consume_pending_signals(),
                    _ => Continuation::Continue,
                };
                if continuation == Continuation::Stop {
                    return;
                }
            }
        }
    }

    fn consume_pending_signals(&mut self) -> Continuation {
        if self.stopper.is_stopped() {
            return Continuation::Stop;
        }

        for signal_number in self.signals.pending() {
            let signal = SignalKind::from_signal_number(signal_number);

            DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
                tracing::debug!(message = "signal-forwarder-thread: received", ?signal);
            });

            if !self.sender.blocking_send(signal) {
                // Signal source dropped.
                return Continuation::Stop;
            }
        }

        Continuation::Continue
    }
}
