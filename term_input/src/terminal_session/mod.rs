// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The running pipeline: helper threads, tasks, event bus, and the [`TerminalSession`]
//! facade that owns them.
//!
//! | Part                          | Runs on           | Moves                              |
//! | ----------------------------- | ----------------- | ---------------------------------- |
//! | [`mod@stdin_reader_thread`]     | dedicated thread  | stdin bytes → [`InputSource`]      |
//! | [`mod@signal_forwarder_thread`] | dedicated thread  | OS signals → [`SignalSource`]      |
//! | [`run_input_pump`]            | tokio task        | decoded events → [`EventBus`]      |
//! | [`run_signal_listener`]       | tokio task        | signals → [`EventBus`]             |
//!
//! Only the tasks touch the [`EventBus`], and only the [`RawModeGuard`] touches the
//! terminal attributes.
//!
//! [`RawModeGuard`]: crate::RawModeGuard

// Attach sources.
pub mod event_bus;
pub mod input_pump;
pub mod input_source;
pub mod output_device;
pub mod session;
pub mod session_config;
pub mod signal_listener;
pub mod signal_source;
pub mod terminal_handle;
pub mod terminal_queries;
#[cfg(unix)]
pub mod signal_forwarder_thread;
#[cfg(unix)]
pub mod stdin_reader_thread;

// Re-export.
pub use event_bus::*;
pub use input_pump::*;
pub use input_source::*;
pub use output_device::*;
pub use session::*;
pub use session_config::*;
pub use signal_listener::*;
pub use signal_source::*;
pub use terminal_handle::*;
pub use terminal_queries::*;
#[cfg(unix)]
pub use signal_forwarder_thread::*;
#[cfg(unix)]
pub use stdin_reader_thread::*;
