// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::TerminalDevice;
use crate::{DEBUG_TERM_INPUT_SHOW_PIPELINE, TerminalSessionError};
use std::sync::{Arc, atomic::Ordering};

/// What [`RawModeGuard::release`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The original attributes were written back.
    Restored,
    /// An earlier call already restored them. Nothing was done.
    AlreadyReleased,
}

/// RAII guard that owns the original terminal attributes and restores them exactly once.
///
/// See the [module documentation] for an overview.
///
/// [module documentation]: mod@crate::core::ansi::terminal_raw_mode
#[derive(Debug)]
pub struct RawModeGuard<D: TerminalDevice> {
    device: Arc<D>,
    original_attributes: D::Attributes,
    is_released: bool,
}

impl<D: TerminalDevice> RawModeGuard<D> {
    /// Put `device` into raw mode.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// 1. [`TerminalSessionError::NotATty`], nothing was changed.
    /// 2. [`TerminalSessionError::SessionAlreadyCaptured`], nothing was changed.
    /// 3. [`TerminalSessionError::SystemCallFailed`] for `tcgetattr`, then `tcsetattr`.
    ///    The capture flag is cleared again, and the terminal keeps its attributes.
    pub fn acquire(device: Arc<D>) -> Result<Self, TerminalSessionError> {
        if !device.is_terminal() {
            return Err(TerminalSessionError::NotATty);
        }

        if device.capture_flag().swap(true, Ordering::SeqCst) {
            return Err(TerminalSessionError::SessionAlreadyCaptured);
        }

        let original_attributes = match device.get_attributes() {
            Ok(attributes) => attributes,
            Err(error) => {
                device.capture_flag().store(false, Ordering::SeqCst);
                return Err(TerminalSessionError::system_call_failed("tcgetattr", error));
            }
        };

        let raw_attributes = device.make_raw(&original_attributes);
        if let Err(error) = device.set_attributes(&raw_attributes) {
            device.capture_flag().store(false, Ordering::SeqCst);
            return Err(TerminalSessionError::system_call_failed("tcsetattr", error));
        }

        DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
            tracing::debug!(message = "RawModeGuard::acquire -> raw mode enabled");
        });

        Ok(Self {
            device,
            original_attributes,
            is_released: false,
        })
    }

    /// Write the original attributes back. Only the first call does anything, later
    /// calls return [`ReleaseOutcome::AlreadyReleased`]. A failed restore is not retried.
    ///
    /// # Errors
    ///
    /// Returns [`TerminalSessionError::SystemCallFailed`] if `tcsetattr` fails.
    pub fn release(&mut self) -> Result<ReleaseOutcome, TerminalSessionError> {
        if self.is_released {
            return Ok(ReleaseOutcome::AlreadyReleased);
        }
        self.is_released = true;

        let result = self.device.set_attributes(&self.original_attributes);
        self.device.capture_flag().store(false, Ordering::SeqCst);

        DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
            tracing::debug!(
                message = "RawModeGuard::release -> original attributes written back",
                is_ok = result.is_ok()
            );
        });

        result
            .map(|()| ReleaseOutcome::Restored)
            .map_err(|error| TerminalSessionError::system_call_failed("tcsetattr", error))
    }

    #[must_use]
    pub fn is_released(&self) -> bool { self.is_released }

    #[must_use]
    pub fn original_attributes(&self) -> &D::Attributes { &self.original_attributes }

    #[must_use]
    pub fn device(&self) -> &Arc<D> { &self.device }
}

impl<D: TerminalDevice> Drop for RawModeGuard<D> {
    fn drop(&mut self) {
        if let Err(error) = self.release() {
            tracing::warn!(
                message = "RawModeGuard::drop -> failed to restore terminal attributes",
                ?error
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FakeAttributes, FakeTerminal};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_acquire_release_round_trip_restores_exact_attributes() {
        let device = Arc::new(FakeTerminal::new());
        let before = device.current_attributes();

        let mut guard = RawModeGuard::acquire(device.clone()).unwrap();
        assert_eq!(device.current_attributes(), device.make_raw(&before));
        assert!(device.is_captured());

        assert_eq!(guard.release().unwrap(), ReleaseOutcome::Restored);
        assert_eq!(device.current_attributes(), before);
        assert!(!device.is_captured());
        assert_eq!(device.attribute_writes().len(), 2);
    }

    #[test]
    fn test_release_twice_is_a_no_op() {
        let device = Arc::new(FakeTerminal::new());
        let mut guard = RawModeGuard::acquire(device.clone()).unwrap();
        assert_eq!(guard.release().unwrap(), ReleaseOutcome::Restored);
        assert_eq!(guard.release().unwrap(), ReleaseOutcome::AlreadyReleased);
        drop(guard);
        assert_eq!(device.attribute_writes().len(), 2);
    }

    #[test]
    fn test_drop_releases() {
        let device = Arc::new(FakeTerminal::new());
        {
            let _guard = RawModeGuard::acquire(device.clone()).unwrap();
            assert!(device.current_attributes().is_raw());
        }
        assert_eq!(device.current_attributes(), FakeAttributes::default());
        assert!(!device.is_captured());
    }

    #[test]
    fn test_not_a_tty_changes_nothing() {
        let device = Arc::new(FakeTerminal::not_a_tty());
        let result = RawModeGuard::acquire(device.clone());
        assert!(matches!(result, Err(TerminalSessionError::NotATty)));
        assert!(device.attribute_writes().is_empty());
        assert!(!device.is_captured());
    }

    #[test]
    fn test_second_acquire_fails_without_mutation() {
        let device = Arc::new(FakeTerminal::new());
        let _guard = RawModeGuard::acquire(device.clone()).unwrap();
        let result = RawModeGuard::acquire(device.clone());
        assert!(matches!(
            result,
            Err(TerminalSessionError::SessionAlreadyCaptured)
        ));
        assert_eq!(device.attribute_writes().len(), 1);
    }

    #[test]
    fn test_get_attributes_failure_clears_flag() {
        let device = Arc::new(FakeTerminal::new());
        device.fail_get_attributes(true);
        let result = RawModeGuard::acquire(device.clone());
        assert!(matches!(
            result,
            Err(TerminalSessionError::SystemCallFailed {
                operation: "tcgetattr",
                ..
            })
        ));
        assert!(!device.is_captured());
    }

    #[test]
    fn test_set_attributes_failure_clears_flag() {
        let device = Arc::new(FakeTerminal::new());
        device.fail_set_attributes(true);
        let result = RawModeGuard::acquire(device.clone());
        assert!(matches!(
            result,
            Err(TerminalSessionError::SystemCallFailed {
                operation: "tcsetattr",
                ..
            })
        ));
        assert!(!device.is_captured());
        assert_eq!(device.current_attributes(), FakeAttributes::default());
    }

    #[test]
    fn test_failed_restore_is_reported_once() {
        let device = Arc::new(FakeTerminal::new());
        let mut guard = RawModeGuard::acquire(device.clone()).unwrap();
        device.fail_set_attributes(true);
        assert!(guard.release().is_err());
        assert_eq!(guard.release().unwrap(), ReleaseOutcome::AlreadyReleased);
        assert!(!device.is_captured());
    }
}
