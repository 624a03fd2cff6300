// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::VecDeque, time::Duration};

/// Result of a byte read that is bounded by a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRead {
    Byte(u8),
    /// Nothing arrived in time. The source is still open.
    TimedOut,
    /// The source is closed or exhausted.
    Closed,
}

/// Where the [`EventDecoder`] pulls bytes from.
///
/// Both methods must be cancel safe: if the returned future is dropped before it
/// completes, no byte is lost. The [`EventDecoder`] relies on this for the ESC
/// disambiguation timeout.
///
/// [`EventDecoder`]: super::EventDecoder
pub trait ByteSource: Send {
    /// Returns `None` once the source is closed or exhausted.
    fn next_byte(&mut self) -> impl Future<Output = Option<u8>> + Send;

    /// Like [`Self::next_byte`], but gives up after `timeout`.
    fn next_byte_within(
        &mut self,
        timeout: Duration,
    ) -> impl Future<Output = ByteRead> + Send {
        async move {
            match tokio::time::timeout(timeout, self.next_byte()).await {
                Ok(Some(byte)) => ByteRead::Byte(byte),
                Ok(None) => ByteRead::Closed,
                Err(_elapsed) => ByteRead::TimedOut,
            }
        }
    }
}

/// A finite, fully buffered source. It never times out, which makes decoding over it
/// deterministic and usable without a runtime.
impl ByteSource for VecDeque<u8> {
    fn next_byte(&mut self) -> impl Future<Output = Option<u8>> + Send {
        std::future::ready(self.pop_front())
    }

    fn next_byte_within(
        &mut self,
        _timeout: Duration,
    ) -> impl Future<Output = ByteRead> + Send {
        std::future::ready(match self.pop_front() {
            Some(byte) => ByteRead::Byte(byte),
            None => ByteRead::Closed,
        })
    }
}
