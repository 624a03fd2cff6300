// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! OSC (Operating System Command) replies. Only OSC 11 (background color) is decoded.
//!
//! The reply to `ESC]11;?ESC\` looks like `ESC]11;rgb:RRRR/GGGG/BBBB` followed by `ST`
//! (`ESC \`) or `BEL`. Each channel has 1 to 4 hex digits, and is scaled to 16 bits, so
//! `rgb:f/8/0` and `rgb:ffff/8888/0000` are the same color.

use super::Rgb16;
use crate::OSC_BACKGROUND_COLOR_PREFIX;

/// Parse an OSC payload (between `ESC ]` and the terminator).
#[must_use]
pub fn parse_background_color(payload: &[u8]) -> Option<Rgb16> {
    let channels = payload.strip_prefix(OSC_BACKGROUND_COLOR_PREFIX)?;
    let mut iter = channels.split(|&byte| byte == b'/');
    let red = parse_channel(iter.next()?)?;
    let green = parse_channel(iter.next()?)?;
    let blue = parse_channel(iter.next()?)?;
    if iter.next().is_some() {
        return None;
    }
    Some(Rgb16::new(red, green, blue))
}

/// Scale `1..=4` hex digits to the full `u16` range.
fn parse_channel(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || digits.len() > 4 || !digits.iter().all(u8::is_ascii_hexdigit)
    {
        return None;
    }
    let text = std::str::from_utf8(digits).ok()?;
    let value = u32::from_str_radix(text, 16).ok()?;
    let max = (1_u32 << (4 * digits.len())) - 1;
    u16::try_from(value * u32::from(u16::MAX) / max).ok()
}
