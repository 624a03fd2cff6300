// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Terminal status reports that arrive as CSI sequences: focus changes and the cursor
//! position report that answers the window size query.

use super::{InputEvent, Size, DEFAULT_WINDOW_SIZE};
use crate::{CURSOR_POSITION_REPORT_FINAL, FOCUS_GAINED_FINAL, FOCUS_LOST_FINAL};

/// Decode CSI sequences that are terminal events rather than keys. `params` excludes
/// `ESC [` and the final byte.
///
/// A cursor position report always produces a [`InputEvent::WindowSize`]: if its payload
/// is not a `rows;cols` pair of non zero numbers, [`DEFAULT_WINDOW_SIZE`] is used.
///
/// Note that xterm sends F3 with modifiers as `ESC[1;MR`, which is indistinguishable from
/// a size report. It decodes as a size report.
#[must_use]
pub fn parse_csi_terminal_event(params: &[u8], final_byte: u8) -> Option<InputEvent> {
    match final_byte {
        FOCUS_GAINED_FINAL if params.is_empty() => Some(InputEvent::FocusGained),
        FOCUS_LOST_FINAL if params.is_empty() => Some(InputEvent::FocusLost),
        CURSOR_POSITION_REPORT_FINAL => Some(InputEvent::WindowSize(
            parse_cursor_position_report(params).unwrap_or(DEFAULT_WINDOW_SIZE),
        )),
        _ => None,
    }
}

/// Parse the `rows;cols` payload of `ESC[rows;colsR`.
#[must_use]
pub fn parse_cursor_position_report(params: &[u8]) -> Option<Size> {
    let text = std::str::from_utf8(params).ok()?;
    let (rows, columns) = text.split_once(';')?;
    let rows = parse_non_zero(rows)?;
    let columns = parse_non_zero(columns)?;
    Some(Size { rows, columns })
}

fn parse_non_zero(field: &str) -> Option<u16> {
    if field.is_empty() || !field.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    field.parse::<u16>().ok().filter(|it| *it != 0)
}
