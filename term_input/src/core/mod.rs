// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Protocol and OS capability layer.
//!
//! Nothing in here spawns tasks or threads. The [`ansi`] module decodes terminal input
//! and owns raw mode, [`common`] holds small shared types, [`log`] sets up [`tracing`],
//! and [`test_fixtures`] provides fakes for dependency injection in tests.
//!
//! [`tracing`]: https://docs.rs/tracing

// Attach sources.
pub mod ansi;
pub mod common;
pub mod log;
pub mod test_fixtures;

// Re-export.
pub use ansi::*;
pub use common::*;
pub use log::*;
pub use test_fixtures::*;
