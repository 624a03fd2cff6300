// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! UTF-8 helpers for the decoder, which reads multi byte characters one byte at a time.

/// Number of bytes in the UTF-8 sequence that starts with `lead_byte`, or `None` if
/// `lead_byte` can't start one (a continuation byte, `0xC0`, `0xC1`, or `0xF5..`).
#[must_use]
pub fn utf8_sequence_len(lead_byte: u8) -> Option<usize> {
    match lead_byte {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

#[must_use]
pub fn is_utf8_continuation_byte(byte: u8) -> bool { byte & 0b1100_0000 == 0b1000_0000 }

/// Decode one complete UTF-8 sequence. Returns `None` for overlong encodings, surrogates,
/// and anything else that [`std::str::from_utf8`] rejects.
#[must_use]
pub fn decode_utf8_char(bytes: &[u8]) -> Option<char> {
    let text = std::str::from_utf8(bytes).ok()?;
    let mut chars = text.chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(b'a', Some(1))]
    #[test_case(0xC3, Some(2))]
    #[test_case(0xE2, Some(3))]
    #[test_case(0xF0, Some(4))]
    #[test_case(0x80, None)]
    #[test_case(0xC0, None)]
    #[test_case(0xFF, None)]
    fn test_utf8_sequence_len(byte: u8, expected: Option<usize>) {
        assert_eq!(utf8_sequence_len(byte), expected);
    }

    #[test]
    fn test_decode_utf8_char() {
        assert_eq!(decode_utf8_char("é".as_bytes()), Some('é'));
        assert_eq!(decode_utf8_char("😀".as_bytes()), Some('😀'));
        // Surrogate half, encoded as if it were a scalar value.
        assert_eq!(decode_utf8_char(&[0xED, 0xA0, 0x80]), None);
        // Overlong encoding of '/'.
        assert_eq!(decode_utf8_char(&[0xE0, 0x80, 0xAF]), None);
    }
}
