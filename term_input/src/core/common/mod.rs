// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod common_enums;
pub mod pending_query;
pub mod session_error;
pub mod stop_switch;

// Re-export.
pub use common_enums::*;
pub use pending_query::*;
pub use session_error::*;
pub use stop_switch::*;
