// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod fake_terminal;

// Re-export.
pub use fake_terminal::*;
