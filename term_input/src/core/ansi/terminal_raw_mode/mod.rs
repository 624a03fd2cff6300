// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Raw mode, with restore guaranteed.
//!
//! [`RawModeGuard::acquire`] snapshots the terminal attributes of a [`TerminalDevice`]
//! and writes a raw copy: no line buffering (`ICANON`), no echo (`ECHO`), and no signal
//! generation for `Ctrl+C` / `Ctrl+Z` (`ISIG`), with `VMIN = 1, VTIME = 0` so that each
//! byte is readable as soon as it is typed. [`RawModeGuard::release`] writes the snapshot
//! back, at most once, and [`Drop`] does it if nobody else did.
//!
//! At most one guard can be alive per device. The device's capture flag enforces this,
//! and a second [`RawModeGuard::acquire`] fails with
//! [`TerminalSessionError::SessionAlreadyCaptured`] without touching the terminal.
//!
//! ```no_run
//! # #[cfg(unix)]
//! # fn run() -> Result<(), term_input::TerminalSessionError> {
//! use std::sync::Arc;
//! use term_input::{RawModeGuard, StdinTerminal};
//!
//! let mut guard = RawModeGuard::acquire(Arc::new(StdinTerminal))?;
//! // ... read bytes from stdin ...
//! guard.release()?;
//! # Ok(())
//! # }
//! ```
//!
//! [`TerminalSessionError::SessionAlreadyCaptured`]: crate::TerminalSessionError::SessionAlreadyCaptured

// Private modules (hide internal structure).
mod raw_mode_core;
mod terminal_device;

#[cfg(unix)]
mod raw_mode_unix;

// Re-export the public API (flat, ergonomic surface).
pub use raw_mode_core::*;
pub use terminal_device::*;

#[cfg(unix)]
pub use raw_mode_unix::*;
