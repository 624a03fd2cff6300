// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Fakes for dependency injection. [`TerminalSession::start_with`] takes these in place
//! of `stdin`, `stdout`, and the real terminal, so that the whole pipeline runs in tests
//! and in CI where there is no terminal.
//!
//! [`TerminalSession::start_with`]: crate::TerminalSession::start_with

// Attach sources.
pub mod output_device_fixtures;
pub mod session_io_fixtures;
pub mod terminal_device_fixtures;

// Re-export.
pub use output_device_fixtures::*;
pub use session_io_fixtures::*;
pub use terminal_device_fixtures::*;
