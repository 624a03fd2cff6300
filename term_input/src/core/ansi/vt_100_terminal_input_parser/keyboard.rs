// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Keyboard decoding.
//!
//! These functions are pure: they look at bytes that the [`EventDecoder`] has already
//! delimited and return `None` when a sequence isn't a key.
//!
//! # Ambiguous bytes
//!
//! Some control bytes are produced by more than one key combination. Raw mode can't tell
//! them apart, so they decode to the common key:
//!
//! | Byte   | Decodes to   | Also produced by |
//! | ------ | ------------ | ---------------- |
//! | `0x08` | `Backspace`  | `Ctrl+H`         |
//! | `0x09` | `Tab`        | `Ctrl+I`         |
//! | `0x0A` | `Enter`      | `Ctrl+J`         |
//! | `0x0D` | `Enter`      | `Ctrl+M`         |
//! | `0x7F` | `Backspace`  | `Delete` on some terminals |
//!
//! [`EventDecoder`]: super::EventDecoder

use super::{KeyCode, KeyModifiers, KeyPress};
use crate::{ANSI_PARAM_SEPARATOR, ARROW_DOWN_FINAL, ARROW_LEFT_FINAL, ARROW_RIGHT_FINAL,
            ARROW_UP_FINAL, ASCII_DEL, CONTROL_BACKSPACE, CONTROL_ENTER, CONTROL_LF, CONTROL_TAB,
            CTRL_TO_UPPERCASE_MASK, FUNCTION_F1_CODE, FUNCTION_F5_CODE,
            FUNCTION_F6_CODE, FUNCTION_F10_CODE, FUNCTION_F11_CODE, FUNCTION_F12_CODE,
            PRINTABLE_ASCII_MIN, SPECIAL_DELETE_CODE, SPECIAL_END_ALT1_CODE,
            SPECIAL_END_ALT2_CODE, SPECIAL_END_FINAL, SPECIAL_HOME_ALT1_CODE,
            SPECIAL_HOME_ALT2_CODE, SPECIAL_HOME_FINAL, SPECIAL_INSERT_CODE,
            SPECIAL_PAGE_DOWN_CODE, SPECIAL_PAGE_UP_CODE, SS3_F1_FINAL, SS3_F4_FINAL,
            SS3_FUNCTION_KEY_BASE};

/// Decode a single byte below `0x80` that isn't `ESC`.
#[must_use]
pub fn decode_single_byte(byte: u8) -> KeyPress {
    let code = match byte {
        CONTROL_BACKSPACE | ASCII_DEL => KeyCode::Backspace,
        CONTROL_TAB => KeyCode::Tab,
        CONTROL_LF | CONTROL_ENTER => KeyCode::Enter,
        _ if byte < PRINTABLE_ASCII_MIN => {
            KeyCode::Control(char::from(byte + CTRL_TO_UPPERCASE_MASK))
        }
        _ => KeyCode::Char(char::from(byte)),
    };
    KeyPress::new(code)
}

/// Navigation key for a CSI or SS3 final byte: `A/B/C/D` arrows, `H` Home, `F` End.
#[must_use]
pub fn navigation_key(final_byte: u8) -> Option<KeyCode> {
    match final_byte {
        ARROW_UP_FINAL => Some(KeyCode::Up),
        ARROW_DOWN_FINAL => Some(KeyCode::Down),
        ARROW_RIGHT_FINAL => Some(KeyCode::Right),
        ARROW_LEFT_FINAL => Some(KeyCode::Left),
        SPECIAL_HOME_FINAL => Some(KeyCode::Home),
        SPECIAL_END_FINAL => Some(KeyCode::End),
        _ => None,
    }
}

/// The `ESC[N~` table.
#[must_use]
pub fn vt_key(code: u16) -> Option<KeyCode> {
    match code {
        SPECIAL_HOME_ALT1_CODE | SPECIAL_HOME_ALT2_CODE => Some(KeyCode::Home),
        SPECIAL_INSERT_CODE => Some(KeyCode::Insert),
        SPECIAL_DELETE_CODE => Some(KeyCode::Delete),
        SPECIAL_END_ALT1_CODE | SPECIAL_END_ALT2_CODE => Some(KeyCode::End),
        SPECIAL_PAGE_UP_CODE => Some(KeyCode::PageUp),
        SPECIAL_PAGE_DOWN_CODE => Some(KeyCode::PageDown),
        FUNCTION_F1_CODE..=FUNCTION_F5_CODE => function_key(code - FUNCTION_F1_CODE + 1),
        FUNCTION_F6_CODE..=FUNCTION_F10_CODE => function_key(code - FUNCTION_F6_CODE + 6),
        FUNCTION_F11_CODE..=FUNCTION_F12_CODE => {
            function_key(code - FUNCTION_F11_CODE + 11)
        }
        _ => None,
    }
}

fn function_key(number: u16) -> Option<KeyCode> {
    u8::try_from(number).ok().map(KeyCode::Function)
}

/// The byte after `ESC O`. `P..=~` are function keys counted from `O` (so `ESC O P` is
/// F1); `A/B/C/D/H/F` are cursor keys in application cursor mode.
#[must_use]
pub fn parse_ss3_key(byte: u8) -> Option<KeyPress> {
    match byte {
        SS3_F1_FINAL..=b'~' => Some(KeyPress::new(KeyCode::Function(
            byte - SS3_FUNCTION_KEY_BASE,
        ))),
        _ => navigation_key(byte).map(KeyPress::new),
    }
}

/// Split CSI parameter bytes on `;` into numbers. An empty field is `None`. Returns
/// `None` if any field has a non digit, or doesn't fit in a `u16`.
#[must_use]
pub fn parse_csi_params(params: &[u8]) -> Option<Vec<Option<u16>>> {
    if params.is_empty() {
        return Some(vec![]);
    }
    params
        .split(|&byte| byte == ANSI_PARAM_SEPARATOR)
        .map(|field| {
            if field.is_empty() {
                return Some(None);
            }
            if !field.iter().all(u8::is_ascii_digit) {
                return None;
            }
            std::str::from_utf8(field).ok()?.parse::<u16>().ok().map(Some)
        })
        .collect()
}

/// Keys sent as CSI sequences:
/// - `ESC[A` (no parameters) navigation keys.
/// - `ESC[N~` and `ESC[N;M~` VT keys.
/// - `ESC[1;MA` or `ESC[;MA` navigation keys, and `ESC[1;MP` .. `ESC[1;MS` F1-F4, with
///   modifiers.
///
/// `params` excludes `ESC [` and the final byte.
#[must_use]
pub fn parse_csi_key(params: &[u8], final_byte: u8) -> Option<KeyPress> {
    let fields = parse_csi_params(params)?;
    match (fields.as_slice(), final_byte) {
        ([], _) => navigation_key(final_byte).map(KeyPress::new),
        ([Some(code)], b'~') => vt_key(*code).map(KeyPress::new),
        ([Some(code), Some(modifier)], b'~') => vt_key(*code).map(|key| {
            KeyPress::with_modifiers(key, KeyModifiers::from_csi_parameter(*modifier))
        }),
        ([None | Some(1), Some(modifier)], _) => {
            let modifiers = KeyModifiers::from_csi_parameter(*modifier);
            let code = match final_byte {
                SS3_F1_FINAL..=SS3_F4_FINAL => {
                    KeyCode::Function(final_byte - SS3_FUNCTION_KEY_BASE)
                }
                _ => navigation_key(final_byte)?,
            };
            Some(KeyPress::with_modifiers(code, modifiers))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(0x03, KeyCode::Control('C'))]
    #[test_case(0x00, KeyCode::Control('@'))]
    #[test_case(0x1A, KeyCode::Control('Z'))]
    #[test_case(0x08, KeyCode::Backspace)]
    #[test_case(0x7F, KeyCode::Backspace)]
    #[test_case(0x09, KeyCode::Tab)]
    #[test_case(0x0A, KeyCode::Enter)]
    #[test_case(0x0D, KeyCode::Enter)]
    #[test_case(b'a', KeyCode::Char('a'))]
    #[test_case(b' ', KeyCode::Char(' '))]
    fn test_decode_single_byte(byte: u8, expected: KeyCode) {
        assert_eq!(decode_single_byte(byte), KeyPress::new(expected));
    }

    #[test_case(1, Some(KeyCode::Home))]
    #[test_case(2, Some(KeyCode::Insert))]
    #[test_case(3, Some(KeyCode::Delete))]
    #[test_case(4, Some(KeyCode::End))]
    #[test_case(5, Some(KeyCode::PageUp))]
    #[test_case(6, Some(KeyCode::PageDown))]
    #[test_case(7, Some(KeyCode::Home))]
    #[test_case(8, Some(KeyCode::End))]
    #[test_case(11, Some(KeyCode::Function(1)))]
    #[test_case(15, Some(KeyCode::Function(5)))]
    #[test_case(16, None)]
    #[test_case(17, Some(KeyCode::Function(6)))]
    #[test_case(21, Some(KeyCode::Function(10)))]
    #[test_case(22, None)]
    #[test_case(24, Some(KeyCode::Function(12)))]
    #[test_case(99, None)]
    fn test_vt_key_table(code: u16, expected: Option<KeyCode>) {
        assert_eq!(vt_key(code), expected);
    }

    #[test]
    fn test_parse_ss3_key() {
        assert_eq!(parse_ss3_key(b'P'), Some(KeyPress::new(KeyCode::Function(1))));
        assert_eq!(parse_ss3_key(b'S'), Some(KeyPress::new(KeyCode::Function(4))));
        assert_eq!(parse_ss3_key(b'A'), Some(KeyPress::new(KeyCode::Up)));
        assert_eq!(parse_ss3_key(b'F'), Some(KeyPress::new(KeyCode::End)));
        assert_eq!(parse_ss3_key(b'z'), Some(KeyPress::new(KeyCode::Function(43))));
        assert_eq!(parse_ss3_key(b'1'), None);
    }

    #[test]
    fn test_parse_csi_params() {
        assert_eq!(parse_csi_params(b""), Some(vec![]));
        assert_eq!(parse_csi_params(b"1;5"), Some(vec![Some(1), Some(5)]));
        assert_eq!(parse_csi_params(b";5"), Some(vec![None, Some(5)]));
        assert_eq!(parse_csi_params(b"1;x"), None);
        assert_eq!(parse_csi_params(b"99999"), None);
    }

    #[test_case(b"", b'A', Some(KeyPress::new(KeyCode::Up)))]
    #[test_case(b"", b'H', Some(KeyPress::new(KeyCode::Home)))]
    #[test_case(b"3", b'~', Some(KeyPress::new(KeyCode::Delete)))]
    #[test_case(b"1;5", b'D', Some(KeyPress::with_modifiers(KeyCode::Left, KeyModifiers::CTRL)))]
    #[test_case(b";2", b'C', Some(KeyPress::with_modifiers(KeyCode::Right, KeyModifiers::SHIFT)))]
    #[test_case(b"3;3", b'~', Some(KeyPress::with_modifiers(KeyCode::Delete, KeyModifiers::ALT)))]
    #[test_case(b"1;9", b'A', Some(KeyPress::with_modifiers(KeyCode::Up, KeyModifiers::META)))]
    #[test_case(b"1;6", b'P', Some(KeyPress::with_modifiers(KeyCode::Function(1), KeyModifiers::CTRL | KeyModifiers::SHIFT)))]
    #[test_case(b"2;5", b'A', None)]
    #[test_case(b"1;5", b'X', None)]
    #[test_case(b"", b'Z', None)]
    fn test_parse_csi_key(params: &[u8], final_byte: u8, expected: Option<KeyPress>) {
        assert_eq!(parse_csi_key(params, final_byte), expected);
    }
}
