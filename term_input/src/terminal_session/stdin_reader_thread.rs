// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words EINTR EAGAIN FIONREAD epoll

//! Dedicated thread that moves bytes from `stdin` into an [`InputSource`].
//!
//! It blocks in [`mio::Poll::poll`] on two sources:
//! - `stdin` ([`STDIN_TOKEN`]): readable means a [`rustix::io::read`] won't block. The
//!   read goes straight to the file descriptor, so no bytes hide in a user space buffer
//!   (which `std::io::Stdin` has).
//! - a [`mio::Waker`] ([`WAKER_TOKEN`]): woken by [`InputCloser::close`], so the thread
//!   exits promptly at shutdown without needing input to arrive.
//!
//! `mio` is edge triggered. After each read, `FIONREAD` is used to check for leftovers
//! before going back to `poll`.
//!
//! The thread does no decoding. Decoding happens in the input pump task.

use crate::{Continuation, DEBUG_TERM_INPUT_SHOW_PIPELINE, InputCloser, InputFeeder,
            InputSource, TerminalSessionError};
use mio::{Events, Interest, Poll, Token, Waker, unix::SourceFd};
use rustix::io::Errno;
use std::{io::ErrorKind,
          os::fd::{AsFd, AsRawFd as _},
          sync::Arc};

pub const STDIN_READ_BUFFER_SIZE: usize = 1_024;
pub const STDIN_TOKEN: Token = Token(0);
pub const WAKER_TOKEN: Token = Token(1);
const EVENTS_CAPACITY: usize = 8;

/// Spawn the reader thread for the process's `stdin`.
///
/// # Errors
///
/// Returns [`TerminalSessionError::SpawnFailed`] if the poll instance can't be set up
/// (for example, `epoll` refuses regular files) or the thread can't be spawned.
pub fn spawn_stdin_reader() -> Result<(InputSource, InputCloser), TerminalSessionError> {
    spawn_fd_reader("term-input-stdin", std::io::stdin())
}

/// Like [`spawn_stdin_reader`], for any pollable file descriptor (a pipe in tests).
///
/// # Errors
///
/// See [`spawn_stdin_reader`].
pub fn spawn_fd_reader<F: AsFd + Send + 'static>(
    thread_name: &str,
    fd: F,
) -> Result<(InputSource, InputCloser), TerminalSessionError> {
    let poll_handle = Poll::new()
        .map_err(|error| TerminalSessionError::spawn_failed("input poll", error))?;

    poll_handle
        .registry()
        .register(
            &mut SourceFd(&fd.as_fd().as_raw_fd()),
            STDIN_TOKEN,
            Interest::READABLE,
        )
        .map_err(|error| TerminalSessionError::spawn_failed("input poll", error))?;

    let waker = Arc::new(
        Waker::new(poll_handle.registry(), WAKER_TOKEN)
            .map_err(|error| TerminalSessionError::spawn_failed("input poll", error))?,
    );

    let (source, feeder, closer) = InputSource::channel();
    let closer = closer.with_on_close(move || {
        if let Err(error) = waker.wake() {
            tracing::warn!(message = "stdin-reader-thread: wake failed", ?error);
        }
    });

    let mut reader_thread = StdinReaderThread {
        poll_handle,
        ready_events_buffer: Events::with_capacity(EVENTS_CAPACITY),
        fd,
        read_buffer: [0u8; STDIN_READ_BUFFER_SIZE],
        feeder,
        closer: closer.clone(),
    };

    std::thread::Builder::new()
        .name(thread_name.into())
        .spawn(move || reader_thread.start())
        .map_err(|error| TerminalSessionError::spawn_failed("stdin reader thread", error))?;

    DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
        tracing::debug!(message = "stdin-reader-thread: spawned", thread_name);
    });

    Ok((source, closer))
}

#[allow(missing_debug_implementations)]
pub struct StdinReaderThread<F> {
    poll_handle: Poll,
    ready_events_buffer: Events,
    fd: F,
    read_buffer: [u8; STDIN_READ_BUFFER_SIZE],
    feeder: InputFeeder,
    closer: InputCloser,
}

impl<F> Drop for StdinReaderThread<F> {
    fn drop(&mut self) {
        DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
            tracing::debug!(message = "stdin-reader-thread: exiting");
        });
    }
}

impl<F: AsFd> StdinReaderThread<F> {
    pub fn start(&mut self) {
        loop {
            if let Err(error) = self.poll_handle.poll(&mut self.ready_events_buffer, None) {
                if error.kind() == ErrorKind::Interrupted {
                    continue;
                }
                tracing::warn!(message = "stdin-reader-thread: poll error", ?error);
                return;
            }

            // Breaks the borrow so the handlers can use `&mut self`.
            let ready_events: Vec<(Token, bool)> = self
                .ready_events_buffer
                .iter()
                .map(|event| (event.token(), event.is_read_closed()))
                .collect();

            for (token, is_read_closed) in ready_events {
                let continuation = match token {
                    WAKER_TOKEN => self.consume_wake(),
                    STDIN_TOKEN => self.consume_input(is_read_closed),
                    _ => Continuation::Continue,
                };
                if continuation == Continuation::Stop {
                    return;
                }
            }
        }
    }

    fn consume_wake(&self) -> Continuation {
        if self.closer.is_closed() {
            Continuation::Stop
        } else {
            Continuation::Continue
        }
    }

    /// Reads until there is nothing left. When the writer side is gone there will be no
    /// further readiness event, so keep reading until EOF.
    fn consume_input(&mut self, is_read_closed: bool) -> Continuation {
        if self.closer.is_closed() {
            return Continuation::Stop;
        }

        loop {
            match rustix::io::read(&self.fd, &mut self.read_buffer[..]) {
                Ok(0) => {
                    DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
                        tracing::debug!(message = "stdin-reader-thread: EOF");
                    });
                    return Continuation::Stop;
                }

                Ok(bytes_read) => {
                    DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
                        tracing::trace!(message = "stdin-reader-thread: read", bytes_read);
                    });

                    if !self.feeder.send(&self.read_buffer[..bytes_read]) {
                        // Input source dropped.
                        return Continuation::Stop;
                    }

                    if !is_read_closed && !self.has_leftover_input() {
                        return Continuation::Continue;
                    }
                }

                Err(Errno::INTR) => {}

                // Spurious wakeup.
                Err(Errno::AGAIN) => return Continuation::Continue,

                Err(error) => {
                    tracing::warn!(message = "stdin-reader-thread: read error", ?error);
                    return Continuation::Stop;
                }
            }
        }
    }

    fn has_leftover_input(&self) -> bool {
        rustix::io::ioctl_fionread(&self.fd).is_ok_and(|count| count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ByteSource, EventDecoder, InputEvent, KeyCode};
    use pretty_assertions::assert_eq;
    use std::{io::Write as _, time::Duration};

    #[tokio::test]
    async fn test_pipe_bytes_reach_the_source_then_eof_ends_it() {
        let (pipe_reader, mut pipe_writer) = std::io::pipe().unwrap();
        let (source, _closer) = spawn_fd_reader("test-pipe-reader", pipe_reader).unwrap();
        let mut decoder = EventDecoder::new(source);

        pipe_writer.write_all(b"hi\x1b[A").unwrap();
        drop(pipe_writer);

        let events = tokio::time::timeout(Duration::from_secs(5), async {
            let mut events = vec![];
            while let Some(event) = decoder.next_event().await {
                events.push(event);
            }
            events
        })
        .await
        .unwrap();

        assert_eq!(
            events,
            vec![
                InputEvent::from(KeyCode::Char('h')),
                KeyCode::Char('i').into(),
                KeyCode::Up.into(),
            ]
        );
    }

    #[tokio::test]
    async fn test_large_burst_is_not_stranded() {
        let (pipe_reader, mut pipe_writer) = std::io::pipe().unwrap();
        let (mut source, _closer) = spawn_fd_reader("test-pipe-burst", pipe_reader).unwrap();

        let burst = vec![b'z'; STDIN_READ_BUFFER_SIZE * 3 + 7];
        pipe_writer.write_all(&burst).unwrap();

        let count = tokio::time::timeout(Duration::from_secs(5), async {
            let mut count = 0;
            while count < burst.len() {
                assert_eq!(source.next_byte().await, Some(b'z'));
                count += 1;
            }
            count
        })
        .await
        .unwrap();
        assert_eq!(count, burst.len());
    }

    #[tokio::test]
    async fn test_close_wakes_and_stops_the_thread() {
        let (pipe_reader, mut pipe_writer) = std::io::pipe().unwrap();
        let (mut source, closer) = spawn_fd_reader("test-pipe-close", pipe_reader).unwrap();

        assert!(closer.close());
        assert_eq!(source.next_byte().await, None);

        // Once the thread has exited, it has dropped the read end.
        let mut is_pipe_broken = false;
        for _ in 0..500 {
            if pipe_writer.write_all(b"x").is_err() {
                is_pipe_broken = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(is_pipe_broken);
    }
}
