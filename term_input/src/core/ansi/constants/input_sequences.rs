// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! ANSI/VT100 input sequence constants.
//!
//! # Sequence families
//!
//! - `CSI` = `ESC [`: keys (`ESC[A`, `ESC[3~`, `ESC[1;5D`), focus (`ESC[I`, `ESC[O`),
//!   cursor position reports (`ESC[24;80R`), bracketed paste markers (`ESC[200~`).
//! - `SS3` = `ESC O`: F1-F4 (`ESC O P`..`ESC O S`) and application mode cursor keys.
//! - `OSC` = `ESC ]`: terminal reports such as `ESC]11;rgb:0000/0000/0000 ESC\`,
//!   terminated by `ST` (`ESC \`) or `BEL`.
//!
//! ## Modifiers (CSI 1; m `final_byte`)
//!
//! The terminal sends `m = 1 + bits`, where bit 0 is Shift, bit 1 Alt, bit 2 Ctrl, and
//! bit 3 Meta. So `ESC[1;5D` is Ctrl+Left (`5 = 1 + 4`).

// ==================== ANSI Sequence Components ====================

/// ESC byte (27 in decimal, 0x1B in hex)
pub const ANSI_ESC: u8 = 0x1B;

/// CSI bracket byte: `[` (0x5B)
pub const ANSI_CSI_BRACKET: u8 = b'[';

/// SS3 'O' byte: Second byte of SS3 sequences (0x4F)
pub const ANSI_SS3_O: u8 = b'O';

/// OSC bracket byte: `]` (0x5D)
pub const ANSI_OSC_BRACKET: u8 = b']';

/// String terminator second byte: `\` (as in `ESC \`)
pub const ANSI_ST_BACKSLASH: u8 = b'\\';

/// BEL (0x07), the short form of the OSC string terminator.
pub const ANSI_BEL: u8 = 0x07;

/// Parameter separator byte: `;`
pub const ANSI_PARAM_SEPARATOR: u8 = b';';

/// Function key terminator: `~`
pub const ANSI_FUNCTION_KEY_TERMINATOR: u8 = b'~';

// ==================== CSI byte classes ====================

/// Parameter bytes: `0x30..=0x3F` (digits, `;`, `:`, `<`, `=`, `>`, `?`).
pub const CSI_PARAM_BYTE_RANGE: std::ops::RangeInclusive<u8> = 0x30..=0x3F;

/// Intermediate bytes: `0x20..=0x2F`.
pub const CSI_INTERMEDIATE_BYTE_RANGE: std::ops::RangeInclusive<u8> = 0x20..=0x2F;

/// Longest CSI sequence (counting `ESC [`) before it is given up on.
pub const MAX_CSI_LEN: usize = 64;

/// Longest OSC sequence (counting `ESC ]` and the terminator) before it is given up on.
pub const MAX_OSC_LEN: usize = 512;

// ==================== Navigation keys (CSI / SS3 final bytes) ====================

pub const ARROW_UP_FINAL: u8 = b'A';
pub const ARROW_DOWN_FINAL: u8 = b'B';
pub const ARROW_RIGHT_FINAL: u8 = b'C';
pub const ARROW_LEFT_FINAL: u8 = b'D';
pub const SPECIAL_HOME_FINAL: u8 = b'H';
pub const SPECIAL_END_FINAL: u8 = b'F';

// ==================== Focus and status reports ====================

/// CSI I: terminal window gained focus.
pub const FOCUS_GAINED_FINAL: u8 = b'I';

/// CSI O: terminal window lost focus.
pub const FOCUS_LOST_FINAL: u8 = b'O';

/// CSI rows;cols R: cursor position report, used to learn the window size.
pub const CURSOR_POSITION_REPORT_FINAL: u8 = b'R';

/// OSC 11 reply prefix: `11;rgb:`.
pub const OSC_BACKGROUND_COLOR_PREFIX: &[u8] = b"11;rgb:";

/// OSC 11 code prefix: `11;`. Replies that start with this but do not parse are dropped.
pub const OSC_BACKGROUND_COLOR_CODE: &[u8] = b"11;";

// ==================== Special Keys (CSI n~) ====================

pub const SPECIAL_HOME_ALT1_CODE: u16 = 1;
pub const SPECIAL_INSERT_CODE: u16 = 2;
pub const SPECIAL_DELETE_CODE: u16 = 3;
pub const SPECIAL_END_ALT1_CODE: u16 = 4;
pub const SPECIAL_PAGE_UP_CODE: u16 = 5;
pub const SPECIAL_PAGE_DOWN_CODE: u16 = 6;
/// rxvt
pub const SPECIAL_HOME_ALT2_CODE: u16 = 7;
/// rxvt
pub const SPECIAL_END_ALT2_CODE: u16 = 8;

/// `ESC[200~`: start of a bracketed paste, as CSI parameters.
pub const PASTE_START_PARAMS: &[u8] = b"200";

/// `ESC[201~`: end of a bracketed paste.
pub const PASTE_END_SEQUENCE: &[u8] = b"\x1b[201~";

// ==================== Function Keys (CSI n~) ====================
//
// xterm function key codes have gaps at 16 and 22:
// - F1..F5 = 11..15
// - F6..F10 = 17..21
// - F11, F12 = 23, 24

pub const FUNCTION_F1_CODE: u16 = 11;
pub const FUNCTION_F5_CODE: u16 = 15;
pub const FUNCTION_F6_CODE: u16 = 17;
pub const FUNCTION_F10_CODE: u16 = 21;
pub const FUNCTION_F11_CODE: u16 = 23;
pub const FUNCTION_F12_CODE: u16 = 24;

// ==================== SS3 function keys ====================

/// `ESC O P` is F1, so a byte `b` in `P..=~` maps to `F(b - 'O')`.
pub const SS3_F1_FINAL: u8 = b'P';
pub const SS3_F4_FINAL: u8 = b'S';
pub const SS3_FUNCTION_KEY_BASE: u8 = b'O';

// ==================== Control characters ====================

pub const CONTROL_BACKSPACE: u8 = 0x08;
pub const CONTROL_TAB: u8 = b'\t';
pub const CONTROL_LF: u8 = b'\n';
pub const CONTROL_ENTER: u8 = b'\r';

/// Bytes `0x00..=0x1F` map to `Control(byte + 0x40)`, eg: `0x03` is `Control('C')`.
pub const CTRL_TO_UPPERCASE_MASK: u8 = 0x40;

pub const PRINTABLE_ASCII_MIN: u8 = 0x20;
pub const PRINTABLE_ASCII_MAX: u8 = 0x7E;
pub const ASCII_DEL: u8 = 0x7F;
