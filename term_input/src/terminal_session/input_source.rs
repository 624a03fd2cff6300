// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{ByteSource, StopSignal, StopSwitch};
use std::collections::VecDeque;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// The [`ByteSource`] that sessions decode from.
///
/// Chunks of bytes arrive on a channel, fed by the stdin reader thread (see
/// [`spawn_stdin_reader`]) or by an [`InputFeeder`] in tests. Reads end (return `None`)
/// when either:
/// 1. The [`InputCloser`] is used. Bytes that are still buffered are discarded.
/// 2. Every feeder is dropped, and the buffered bytes are drained.
///
/// [`spawn_stdin_reader`]: crate::spawn_stdin_reader
#[derive(Debug)]
pub struct InputSource {
    receiver: UnboundedReceiver<Vec<u8>>,
    buffer: VecDeque<u8>,
    close_signal: StopSignal,
}

/// Pushes chunks of bytes into an [`InputSource`].
#[derive(Debug, Clone)]
pub struct InputFeeder {
    sender: UnboundedSender<Vec<u8>>,
}

/// Stops an [`InputSource`], from any thread.
#[derive(Debug, Clone)]
pub struct InputCloser {
    close_switch: StopSwitch,
}

impl InputSource {
    #[must_use]
    pub fn channel() -> (InputSource, InputFeeder, InputCloser) {
        let (sender, receiver) = unbounded_channel();
        let (close_switch, close_signal) = StopSwitch::new();
        let source = InputSource {
            receiver,
            buffer: VecDeque::new(),
            close_signal,
        };
        (source, InputFeeder { sender }, InputCloser { close_switch })
    }

    #[must_use]
    pub fn is_closed(&self) -> bool { self.close_signal.is_stopped() }

    async fn recv_byte(&mut self) -> Option<u8> {
        loop {
            if self.close_signal.is_stopped() {
                return None;
            }
            if let Some(byte) = self.buffer.pop_front() {
                return Some(byte);
            }

            let maybe_chunk = tokio::select! {
                biased;
                () = self.close_signal.stopped() => return None,
                maybe_chunk = self.receiver.recv() => maybe_chunk,
            };

            match maybe_chunk {
                Some(chunk) => self.buffer.extend(chunk),
                None => return None,
            }
        }
    }
}

/// Both `select!` branches are cancel safe, and a received chunk is moved into the
/// buffer before the next await, so no byte is lost when a read times out.
impl ByteSource for InputSource {
    fn next_byte(&mut self) -> impl Future<Output = Option<u8>> + Send { self.recv_byte() }
}

impl InputFeeder {
    /// Returns `false` if the source is gone. Empty chunks are fine.
    pub fn send(&self, bytes: impl Into<Vec<u8>>) -> bool {
        self.sender.send(bytes.into()).is_ok()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool { self.sender.is_closed() }
}

impl InputCloser {
    /// `hook` runs exactly once, on the first [`Self::close`].
    #[must_use]
    pub fn with_on_close(self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            close_switch: self.close_switch.with_on_flip(hook),
        }
    }

    /// Idempotent. Returns `true` if this call closed the source.
    pub fn close(&self) -> bool { self.close_switch.flip() }

    #[must_use]
    pub fn is_closed(&self) -> bool { self.close_switch.is_flipped() }
}
