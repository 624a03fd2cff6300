// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Sequences written to the terminal by the session.

/// DEC private mode 2004 on: pasted text arrives wrapped in `ESC[200~` .. `ESC[201~`.
pub const ENABLE_BRACKETED_PASTE: &[u8] = b"\x1b[?2004h";

/// DEC private mode 2004 off.
pub const DISABLE_BRACKETED_PASTE: &[u8] = b"\x1b[?2004l";

/// DEC private mode 1004 on: the terminal sends `ESC[I` / `ESC[O` on focus changes.
pub const ENABLE_FOCUS_REPORTING: &[u8] = b"\x1b[?1004h";

/// DEC private mode 1004 off.
pub const DISABLE_FOCUS_REPORTING: &[u8] = b"\x1b[?1004l";

/// OSC 11 query. The terminal answers with `ESC]11;rgb:RRRR/GGGG/BBBB` and `ST` or `BEL`.
pub const QUERY_BACKGROUND_COLOR: &[u8] = b"\x1b]11;?\x1b\\";

/// Save the cursor, move it as far right and down as it goes, ask for its position (DSR
/// 6), restore it. The `ESC[rows;colsR` reply is the window size.
pub const QUERY_WINDOW_SIZE: &[u8] = b"\x1b7\x1b[4095C\x1b[4095B\x1b[6n\x1b8";
