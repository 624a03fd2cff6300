// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Terminal input protocol and raw mode.
//!
//! - [`constants`]: bytes the decoder matches on, and the sequences the session writes
//!   to the terminal (enable / disable modes, queries).
//! - [`vt_100_terminal_input_parser`]: turns raw input bytes into [`InputEvent`]s.
//! - [`terminal_raw_mode`]: puts the terminal into raw mode and restores it exactly once.
//!
//! ## Raw vs cooked mode
//!
//! In the default (cooked) mode the OS line-buffers input, echoes it, and turns `Ctrl+C`
//! into `SIGINT`. In raw mode every keystroke reaches the program as soon as it is
//! typed, including the multi byte escape sequences that terminals send for arrow keys,
//! function keys, and status reports. That is what [`vt_100_terminal_input_parser`]
//! decodes.

// Attach sources.
pub mod constants;
pub mod terminal_raw_mode;
pub mod vt_100_terminal_input_parser;

// Re-export.
pub use constants::*;
pub use terminal_raw_mode::*;
pub use vt_100_terminal_input_parser::*;
