// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::DEBUG_TERM_INPUT_SHOW_PIPELINE;
use std::{io::{self, Write},
          sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError}};

pub type SendRawTerminal = dyn Write + Send;
pub type SafeRawTerminal = Arc<StdMutex<SendRawTerminal>>;

/// Where the session writes its control sequences (enable / disable codes and
/// queries), and where [`TerminalHandle::write_raw`] sends application output.
///
/// In raw mode the terminal does no output processing, so a line break has to be
/// written as `\r\n`.
///
/// For tests, use [`OutputDeviceExt::new_mock`] to capture everything that is written.
///
/// [`TerminalHandle::write_raw`]: crate::TerminalHandle::write_raw
/// [`OutputDeviceExt::new_mock`]: crate::OutputDeviceExt::new_mock
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct OutputDevice {
    pub resource: SafeRawTerminal,
    pub is_mock: bool,
}

impl Default for OutputDevice {
    fn default() -> Self { Self::new_stdout() }
}

impl OutputDevice {
    #[must_use]
    pub fn new_stdout() -> Self {
        Self {
            resource: Arc::new(StdMutex::new(io::stdout())),
            is_mock: false,
        }
    }

    /// A writer that panicked while holding the lock doesn't make the device unusable.
    pub fn lock(&self) -> MutexGuard<'_, SendRawTerminal> {
        self.resource.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write all of `bytes` and flush, under one lock so that concurrent writers can't
    /// interleave inside an escape sequence.
    ///
    /// # Errors
    ///
    /// Returns the error from the underlying writer.
    pub fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        let mut resource = self.lock();
        resource.write_all(bytes)?;
        resource.flush()
    }

    /// Like [`Self::write_bytes`], for control sequences where the only thing to do with
    /// a failure is to log it.
    pub(crate) fn write_control_sequence(&self, what: &'static str, bytes: &[u8]) {
        match self.write_bytes(bytes) {
            Ok(()) => {
                DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
                    tracing::debug!(message = "OutputDevice -> wrote control sequence", what);
                });
            }
            Err(error) => {
                tracing::warn!(
                    message = "OutputDevice -> failed to write control sequence",
                    what,
                    ?error
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputDeviceExt;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stdout_output_device_is_not_mock() {
        let device = OutputDevice::new_stdout();
        assert!(!device.is_mock);
    }

    #[test]
    fn test_write_control_sequence() {
        let (device, mock) = OutputDevice::new_mock();
        device.write_control_sequence("focus", b"\x1b[?1004h");
        device.clone().write_control_sequence("paste", b"\x1b[?2004h");
        assert_eq!(
            mock.get_copy_of_buffer_as_string(),
            "\x1b[?1004h\x1b[?2004h"
        );
    }

    #[test]
    fn test_write_error_is_returned() {
        struct BrokenPipe;
        impl Write for BrokenPipe {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::from(io::ErrorKind::BrokenPipe))
            }
            fn flush(&mut self) -> io::Result<()> { Ok(()) }
        }

        let device = OutputDevice {
            resource: Arc::new(StdMutex::new(BrokenPipe)),
            is_mock: true,
        };
        let error = device.write_bytes(b"x").unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
        // Logged, not propagated.
        device.write_control_sequence("query", b"x");
    }
}
