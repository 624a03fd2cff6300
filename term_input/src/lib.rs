// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words SIGWINCH termios

//! # Raw mode terminal input, as one async event stream
//!
//! This crate puts the controlling terminal into raw mode, decodes the bytes that the
//! terminal sends into typed [`InputEvent`]s, and merges them with OS signals
//! ([`SIGWINCH`]) and with the answers to terminal queries (window size, background
//! color) into a single ordered [`EventStream`].
//!
//! ```text
//!   stdin bytes                         OS signals
//!      │                                    │
//! ┌────▼────────────────┐        ┌──────────▼──────────┐
//! │ stdin reader thread │        │ signal forwarder    │   (dedicated threads,
//! │ (mio + rustix read) │        │ (mio + signal-hook) │    only move bytes)
//! └────┬────────────────┘        └──────────┬──────────┘
//!      │ InputSource                        │ SignalSource
//! ┌────▼────────────────┐        ┌──────────▼──────────┐
//! │ input pump task     │        │ signal listener task│   (tokio tasks)
//! │ EventDecoder        │        │ re-query size       │
//! └────┬────────────────┘        └──────────┬──────────┘
//!      │ publish                            │ publish
//!      └──────────────┬─────────────────────┘
//!                ┌────▼─────┐
//!                │ EventBus │ ──▶ EventStream (single consumer)
//!                └──────────┘
//! ```
//!
//! The [`TerminalSession`] facade owns all of the above plus the [`RawModeGuard`]. Its
//! teardown always runs in the same order: stop signals, close input, close the bus,
//! join the tasks, write the disable codes, and release raw mode last.
//!
//! ```no_run
//! use miette::IntoDiagnostic;
//! use term_input::{InputEvent, KeyCode, SessionConfig, TerminalSession};
//!
//! # async fn run() -> miette::Result<()> {
//! let config = SessionConfig::default().with_size_detection(true);
//! let mut session = TerminalSession::start(config)?;
//! let mut events = session.take_event_stream().expect("first call");
//! let handle = session.handle();
//!
//! while let Some(event) = events.next().await {
//!     if let InputEvent::Key(key) = &event
//!         && key.code == KeyCode::Control('C')
//!     {
//!         break;
//!     }
//!     handle.write_str(&format!("{event:?}\r\n")).into_diagnostic()?;
//! }
//!
//! session.shutdown().await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`SIGWINCH`]: https://man7.org/linux/man-pages/man7/signal.7.html

// Enforce strict error handling in production library code only. Tests and examples are
// allowed to use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules (re-exported below to provide clean public API).
pub mod core;
pub mod terminal_session;

// Re-export stable public API using glob imports for ergonomic, flat API surface.
pub use crate::core::*;
pub use terminal_session::*;
