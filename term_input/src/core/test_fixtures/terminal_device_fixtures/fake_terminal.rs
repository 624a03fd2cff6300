// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Size, TerminalDevice};
use std::{io,
          sync::{Mutex as StdMutex, PoisonError,
                 atomic::{AtomicBool, Ordering}}};

/// Stand in for `termios`: just the bits that raw mode changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeAttributes {
    pub canonical: bool,
    pub echo: bool,
    pub signals: bool,
    pub vmin: u8,
}

/// Cooked mode, the state a terminal starts in.
impl Default for FakeAttributes {
    fn default() -> Self {
        Self {
            canonical: true,
            echo: true,
            signals: true,
            vmin: 0,
        }
    }
}

impl FakeAttributes {
    #[must_use]
    pub fn is_raw(&self) -> bool { !self.canonical && !self.echo && !self.signals }
}

/// A [`TerminalDevice`] that keeps its attributes in memory, records every successful
/// write, and can be told to fail.
///
/// Each instance has its own capture flag, so tests that use separate instances can run
/// in parallel.
#[derive(Debug)]
pub struct FakeTerminal {
    is_terminal: bool,
    attributes: StdMutex<FakeAttributes>,
    attribute_writes: StdMutex<Vec<FakeAttributes>>,
    window_size: StdMutex<Option<Size>>,
    should_fail_get: AtomicBool,
    should_fail_set: AtomicBool,
    capture_flag: AtomicBool,
}

impl Default for FakeTerminal {
    fn default() -> Self { Self::new() }
}

impl FakeTerminal {
    /// A terminal in cooked mode that doesn't know its window size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            is_terminal: true,
            attributes: StdMutex::new(FakeAttributes::default()),
            attribute_writes: StdMutex::new(vec![]),
            window_size: StdMutex::new(None),
            should_fail_get: AtomicBool::new(false),
            should_fail_set: AtomicBool::new(false),
            capture_flag: AtomicBool::new(false),
        }
    }

    /// Like a pipe or a file on `stdin`.
    #[must_use]
    pub fn not_a_tty() -> Self {
        Self {
            is_terminal: false,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_window_size(self, size: Size) -> Self {
        self.set_window_size(Some(size));
        self
    }

    pub fn set_window_size(&self, size: Option<Size>) {
        *lock(&self.window_size) = size;
    }

    pub fn fail_get_attributes(&self, should_fail: bool) {
        self.should_fail_get.store(should_fail, Ordering::SeqCst);
    }

    pub fn fail_set_attributes(&self, should_fail: bool) {
        self.should_fail_set.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn current_attributes(&self) -> FakeAttributes { *lock(&self.attributes) }

    /// Every successful [`TerminalDevice::set_attributes`] call, oldest first.
    #[must_use]
    pub fn attribute_writes(&self) -> Vec<FakeAttributes> {
        lock(&self.attribute_writes).clone()
    }

    #[must_use]
    pub fn is_captured(&self) -> bool { self.capture_flag.load(Ordering::SeqCst) }
}

impl TerminalDevice for FakeTerminal {
    type Attributes = FakeAttributes;

    fn is_terminal(&self) -> bool { self.is_terminal }

    fn get_attributes(&self) -> io::Result<FakeAttributes> {
        if self.should_fail_get.load(Ordering::SeqCst) {
            return Err(io::Error::from(io::ErrorKind::Unsupported));
        }
        Ok(self.current_attributes())
    }

    fn set_attributes(&self, attributes: &FakeAttributes) -> io::Result<()> {
        if self.should_fail_set.load(Ordering::SeqCst) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        *lock(&self.attributes) = *attributes;
        lock(&self.attribute_writes).push(*attributes);
        Ok(())
    }

    fn make_raw(&self, _original: &FakeAttributes) -> FakeAttributes {
        FakeAttributes {
            canonical: false,
            echo: false,
            signals: false,
            vmin: 1,
        }
    }

    fn window_size(&self) -> Option<Size> { *lock(&self.window_size) }

    fn capture_flag(&self) -> &AtomicBool { &self.capture_flag }
}

fn lock<T>(mutex: &StdMutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failed_set_is_not_recorded() {
        let device = FakeTerminal::new();
        device.fail_set_attributes(true);
        let raw = device.make_raw(&device.current_attributes());
        assert!(device.set_attributes(&raw).is_err());
        assert!(device.attribute_writes().is_empty());
        assert_eq!(device.current_attributes(), FakeAttributes::default());
    }

    #[test]
    fn test_window_size() {
        let device = FakeTerminal::new();
        assert_eq!(device.window_size(), None);
        let device = device.with_window_size(Size { rows: 50, columns: 132 });
        assert_eq!(device.window_size(), Some(Size { rows: 50, columns: 132 }));
    }
}
