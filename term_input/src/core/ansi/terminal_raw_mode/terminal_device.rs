// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::Size;
use std::{fmt::Debug, io, sync::atomic::AtomicBool};

/// Capability to read and write the attributes of a terminal.
///
/// [`RawModeGuard`] is the only code that calls the attribute methods. The real
/// implementation is [`StdinTerminal`]; tests use [`FakeTerminal`].
///
/// [`RawModeGuard`]: super::RawModeGuard
/// [`StdinTerminal`]: super::StdinTerminal
/// [`FakeTerminal`]: crate::FakeTerminal
pub trait TerminalDevice: Send + Sync + 'static {
    /// Opaque snapshot of the terminal settings (`termios` on Unix).
    type Attributes: Clone + Debug + Send + Sync + 'static;

    fn is_terminal(&self) -> bool;

    /// # Errors
    ///
    /// Returns the OS error if the attributes can't be read.
    fn get_attributes(&self) -> io::Result<Self::Attributes>;

    /// # Errors
    ///
    /// Returns the OS error if the attributes can't be written.
    fn set_attributes(&self, attributes: &Self::Attributes) -> io::Result<()>;

    /// Returns the raw mode version of `original`.
    fn make_raw(&self, original: &Self::Attributes) -> Self::Attributes;

    /// Window size as known to the OS (`TIOCGWINSZ`), if available.
    fn window_size(&self) -> Option<Size>;

    /// Set while a [`RawModeGuard`] owns this device.
    ///
    /// [`RawModeGuard`]: super::RawModeGuard
    fn capture_flag(&self) -> &AtomicBool;
}
