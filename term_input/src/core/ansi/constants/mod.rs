// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! ANSI / VT100 escape sequence constants.
//!
//! - **input_sequences**: bytes that appear in what the terminal sends us.
//! - **output_sequences**: what we send the terminal to turn on modes and ask questions.
//!
//! ```rust
//! use term_input::{ANSI_ESC, ENABLE_BRACKETED_PASTE};
//!
//! assert_eq!(ANSI_ESC, 0x1B);
//! assert_eq!(ENABLE_BRACKETED_PASTE, b"\x1b[?2004h");
//! ```

// Skip rustfmt for rest of file to preserve manual alignment.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Private modules (hide internal structure).
mod input_sequences;
mod output_sequences;

// Public re-exports (flat API) for convenience.
pub use input_sequences::*;
pub use output_sequences::*;
