// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Input event types.
//!
//! These are the result of decoding ANSI sequences and UTF-8 text, plus the signal
//! events that the session merges into the same stream.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys. The terminal encodes them as `1 + bits` in the second CSI
    /// parameter, eg: `ESC[1;5D` is `1 + CTRL` + Left.
    ///
    /// Modifiers compose by OR-ing: `KeyModifiers::CTRL | KeyModifiers::SHIFT`.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
        const META  = 0b0000_1000;
    }
}

impl KeyModifiers {
    /// Decode the CSI modifier parameter `m`, where `m = 1 + bits`. Values of `0` and
    /// `1` both mean "no modifiers".
    #[must_use]
    pub fn from_csi_parameter(modifier_param: u16) -> Self {
        let bits = modifier_param.saturating_sub(1);
        Self::from_bits_truncate(u8::try_from(bits & 0xFF).unwrap_or_default())
    }
}

/// Keyboard key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Regular printable character.
    Char(char),
    /// A control byte `0x00..=0x1F`, as the letter it is typed with. `0x03` is
    /// `Control('C')`, `0x00` is `Control('@')`.
    Control(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Up,
    Down,
    Left,
    Right,
    /// Function keys F1-F12.
    Function(u8),
}

/// A key plus the modifiers held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    #[must_use]
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[must_use]
    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self { Self::new(code) }
}

/// Terminal window size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub rows: u16,
    pub columns: u16,
}

/// Used when the terminal never reports its size, or reports it in a form that does not
/// parse.
pub const DEFAULT_WINDOW_SIZE: Size = Size {
    rows: 24,
    columns: 80,
};

impl Default for Size {
    fn default() -> Self { DEFAULT_WINDOW_SIZE }
}

/// A color with 16 bit channels, as reported by OSC 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb16 {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Rgb16 {
    #[must_use]
    pub fn new(red: u16, green: u16, blue: u16) -> Self { Self { red, green, blue } }

    /// Rec. 601 luma, normalized to `0.0..=1.0`.
    #[must_use]
    pub fn luminance(&self) -> f64 {
        let max = f64::from(u16::MAX);
        0.299 * f64::from(self.red) / max
            + 0.587 * f64::from(self.green) / max
            + 0.114 * f64::from(self.blue) / max
    }

    /// A background with luma below one half is dark.
    #[must_use]
    pub fn is_dark(&self) -> bool { self.luminance() < 0.5 }
}

/// Process signals that the session forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// `SIGWINCH`.
    WindowChanged,
    /// Any other signal number that the session was asked to forward.
    Other(i32),
}

/// The unit that flows through the event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyPress),
    /// Bytes that form a well delimited sequence that this decoder doesn't know about,
    /// kept verbatim.
    UnrecognizedSequence(Vec<u8>),
    /// Reply to the window size query.
    WindowSize(Size),
    /// Reply to the background color query.
    BackgroundColor(Rgb16),
    FocusGained,
    FocusLost,
    /// Contents of a bracketed paste.
    Paste(String),
    Signal(SignalKind),
}

impl From<KeyPress> for InputEvent {
    fn from(key: KeyPress) -> Self { Self::Key(key) }
}

impl From<KeyCode> for InputEvent {
    fn from(code: KeyCode) -> Self { Self::Key(KeyPress::new(code)) }
}

/// An event plus the exact input bytes it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    pub event: InputEvent,
    pub raw: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(0, KeyModifiers::empty())]
    #[test_case(1, KeyModifiers::empty())]
    #[test_case(2, KeyModifiers::SHIFT)]
    #[test_case(3, KeyModifiers::ALT)]
    #[test_case(5, KeyModifiers::CTRL)]
    #[test_case(6, KeyModifiers::CTRL | KeyModifiers::SHIFT)]
    #[test_case(9, KeyModifiers::META)]
    #[test_case(16, KeyModifiers::all())]
    fn test_modifiers_from_csi_parameter(param: u16, expected: KeyModifiers) {
        assert_eq!(KeyModifiers::from_csi_parameter(param), expected);
    }

    #[test]
    fn test_black_is_dark_and_white_is_light() {
        assert!(Rgb16::new(0, 0, 0).is_dark());
        assert!(!Rgb16::new(u16::MAX, u16::MAX, u16::MAX).is_dark());
    }

    #[test]
    fn test_luminance_weights_green_most() {
        let green = Rgb16::new(0, u16::MAX, 0).luminance();
        let red = Rgb16::new(u16::MAX, 0, 0).luminance();
        let blue = Rgb16::new(0, 0, u16::MAX).luminance();
        assert!(green > red && red > blue);
        assert!((Rgb16::new(u16::MAX, u16::MAX, u16::MAX).luminance() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_size() {
        assert_eq!(Size::default(), Size { rows: 24, columns: 80 });
    }
}
