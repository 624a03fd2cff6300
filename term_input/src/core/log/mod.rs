// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`tracing`] setup for programs that use this crate.
//!
//! Once the terminal is in raw mode, `stdout` belongs to the application, so the usual
//! choice is a log file (see [`WriterConfig::File`]). A `stderr` layer is available for
//! when `stderr` is redirected.
//!
//! [`tracing`]: https://docs.rs/tracing

// Attach sources.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use rolling_file_appender_impl::*;
pub use tracing_config::*;
pub use tracing_init::*;

/// Set this to `true` to see lifecycle and per-event logging from the session pipeline
/// (reader threads, input pump, signal listener, teardown).
pub const DEBUG_TERM_INPUT_SHOW_PIPELINE: bool = false;
