// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The pull based decoder.
//!
//! [`EventDecoder`] reads one byte at a time from a [`ByteSource`] and returns one
//! [`InputEvent`] per call. It keeps a small lookahead buffer so that a byte which turns
//! out to belong to the *next* event (eg: the `ESC` that interrupts a half read CSI
//! sequence) can be pushed back instead of lost.
//!
//! # Byte accounting
//!
//! Every byte read from the source ends up in exactly one [`DecodedEvent::raw`] span,
//! with one exception: a malformed OSC 11 background color reply is consumed without
//! producing an event. Those bytes are counted by
//! [`EventDecoder::absorbed_byte_count`].
//!
//! # ESC disambiguation
//!
//! A lone `ESC` byte is either the Escape key or the start of a sequence. The decoder
//! waits [`ESC_DISAMBIGUATION_TIMEOUT`] for a follow up byte. Terminals write sequences
//! in a single `write(2)`, so a gap that long means the user pressed Escape. The same
//! wait applies to the byte right after `ESC [` and `ESC O`, so that `Alt+[` and `Alt+O`
//! typed on their own are not held back until the next keystroke.

use std::{collections::VecDeque, time::Duration};

use futures_util::FutureExt;

use super::{ByteRead, ByteSource, DecodedEvent, InputEvent, KeyCode, KeyModifiers,
            KeyPress, decode_single_byte, decode_utf8_char,
            is_utf8_continuation_byte, parse_background_color, parse_csi_key,
            parse_csi_terminal_event, parse_ss3_key, utf8_sequence_len};
use crate::{ANSI_BEL, ANSI_CSI_BRACKET, ANSI_ESC, ANSI_FUNCTION_KEY_TERMINATOR,
            ANSI_OSC_BRACKET, ANSI_SS3_O, ANSI_ST_BACKSLASH, ASCII_DEL,
            CSI_INTERMEDIATE_BYTE_RANGE, CSI_PARAM_BYTE_RANGE, MAX_CSI_LEN, MAX_OSC_LEN,
            OSC_BACKGROUND_COLOR_CODE, PASTE_END_SEQUENCE, PASTE_START_PARAMS,
            PRINTABLE_ASCII_MAX, PRINTABLE_ASCII_MIN};

/// How long to wait after a lone `ESC` before deciding it is the Escape key.
pub const ESC_DISAMBIGUATION_TIMEOUT: Duration = Duration::from_millis(30);

/// Decodes raw terminal input into [`InputEvent`]s, one per call.
///
/// ```
/// use std::collections::VecDeque;
/// use term_input::{EventDecoder, InputEvent, KeyCode};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut decoder = EventDecoder::new(VecDeque::from(b"\x1b[Ax".to_vec()));
/// assert_eq!(decoder.next_event().await, Some(KeyCode::Up.into()));
/// assert_eq!(decoder.next_event().await, Some(KeyCode::Char('x').into()));
/// assert_eq!(decoder.next_event().await, None);
/// # }
/// ```
#[derive(Debug)]
pub struct EventDecoder<S> {
    source: S,
    lookahead: VecDeque<u8>,
    esc_timeout: Duration,
    absorbed_byte_count: usize,
    is_finished: bool,
}

impl<S: ByteSource> EventDecoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            lookahead: VecDeque::with_capacity(4),
            esc_timeout: ESC_DISAMBIGUATION_TIMEOUT,
            absorbed_byte_count: 0,
            is_finished: false,
        }
    }

    #[must_use]
    pub fn with_esc_timeout(mut self, esc_timeout: Duration) -> Self {
        self.esc_timeout = esc_timeout;
        self
    }

    /// Bytes consumed without producing an event (malformed OSC 11 replies).
    #[must_use]
    pub fn absorbed_byte_count(&self) -> usize { self.absorbed_byte_count }

    /// Gives back the source. Bytes in the lookahead buffer are dropped.
    pub fn into_source(self) -> S { self.source }

    /// Returns `None` once the source is closed, and forever after.
    pub async fn next_event(&mut self) -> Option<InputEvent> {
        self.next_decoded().await.map(|decoded| decoded.event)
    }

    /// Like [`Self::next_event`], but also returns the bytes the event came from.
    pub async fn next_decoded(&mut self) -> Option<DecodedEvent> {
        loop {
            if self.is_finished {
                return None;
            }

            let mut raw = Vec::new();
            let Some(first) = self.read(&mut raw).await else {
                self.is_finished = true;
                return None;
            };

            let maybe_event = match first {
                ANSI_ESC => self.decode_escape(&mut raw).await,
                0x00..=0x7F => Some(decode_single_byte(first).into()),
                _ => Some(self.decode_utf8(&mut raw).await),
            };

            match maybe_event {
                Some(event) => return Some(DecodedEvent { event, raw }),
                None => self.absorbed_byte_count += raw.len(),
            }
        }
    }
}

/// Byte level reads. Every byte read is appended to `raw`, the span of the event that is
/// being decoded.
impl<S: ByteSource> EventDecoder<S> {
    async fn read(&mut self, raw: &mut Vec<u8>) -> Option<u8> {
        let byte = match self.lookahead.pop_front() {
            Some(byte) => byte,
            None => self.source.next_byte().await?,
        };
        raw.push(byte);
        Some(byte)
    }

    async fn read_within(&mut self, raw: &mut Vec<u8>) -> ByteRead {
        let result = match self.lookahead.pop_front() {
            Some(byte) => ByteRead::Byte(byte),
            None => self.source.next_byte_within(self.esc_timeout).await,
        };
        if let ByteRead::Byte(byte) = result {
            raw.push(byte);
        }
        result
    }

    /// Moves the last byte of `raw` back to the front of the input.
    fn unread(&mut self, raw: &mut Vec<u8>) {
        if let Some(byte) = raw.pop() {
            self.lookahead.push_front(byte);
        }
    }
}

/// Sequence decoding. `raw` holds the bytes read so far for the current event.
impl<S: ByteSource> EventDecoder<S> {
    /// `raw` is `[ESC]`. Returns `None` only for an absorbed OSC reply.
    async fn decode_escape(&mut self, raw: &mut Vec<u8>) -> Option<InputEvent> {
        let second = match self.read_within(raw).await {
            ByteRead::Byte(byte) => byte,
            ByteRead::TimedOut | ByteRead::Closed => {
                return Some(KeyCode::Escape.into());
            }
        };

        match second {
            ANSI_CSI_BRACKET => Some(self.decode_csi(raw).await),
            ANSI_SS3_O => Some(self.decode_ss3(raw).await),
            ANSI_OSC_BRACKET => self.decode_osc(raw).await,
            PRINTABLE_ASCII_MIN..=PRINTABLE_ASCII_MAX => Some(alt(KeyCode::Char(
                char::from(second),
            ))),
            ASCII_DEL => Some(alt(KeyCode::Backspace)),
            _ => {
                self.unread(raw);
                Some(KeyCode::Escape.into())
            }
        }
    }

    /// `raw` is `[ESC, O]`. A byte after `ESC O` that can't be part of an SS3 sequence
    /// (a control byte such as `ESC`, `DEL`, or a UTF-8 lead byte) is pushed back.
    async fn decode_ss3(&mut self, raw: &mut Vec<u8>) -> InputEvent {
        let byte = match self.read_within(raw).await {
            ByteRead::Byte(byte) => byte,
            ByteRead::TimedOut => return alt(KeyCode::Char(char::from(ANSI_SS3_O))),
            ByteRead::Closed => return unrecognized(raw),
        };

        if let Some(key) = parse_ss3_key(byte) {
            return key.into();
        }
        if !(PRINTABLE_ASCII_MIN..=PRINTABLE_ASCII_MAX).contains(&byte) {
            self.unread(raw);
        }
        unrecognized(raw)
    }

    /// `raw` is `[ESC, []`.
    ///
    /// Parameter (`0x30..=0x3F`) and intermediate (`0x20..=0x2F`) bytes are collected
    /// until a final byte. Final bytes are `@`, `A..=Z` and `~`. The other bytes in
    /// `0x5B..=0x7D` (lowercase letters and some punctuation) are kept as payload: the
    /// sequences that end with them are replies to queries that this crate never sends,
    /// and treating them as payload keeps a garbled reply such as `ESC[garbageR` in one
    /// piece. Any other byte aborts the sequence and is pushed back.
    async fn decode_csi(&mut self, raw: &mut Vec<u8>) -> InputEvent {
        let mut next = match self.read_within(raw).await {
            ByteRead::Byte(byte) => Some(byte),
            ByteRead::TimedOut => return alt(KeyCode::Char(char::from(ANSI_CSI_BRACKET))),
            ByteRead::Closed => None,
        };

        let final_byte = loop {
            let Some(byte) = next else {
                return unrecognized(raw);
            };
            match CsiByte::classify(byte) {
                CsiByte::Final => break byte,
                CsiByte::Payload => {}
                CsiByte::Invalid => {
                    self.unread(raw);
                    return unrecognized(raw);
                }
            }
            if raw.len() >= MAX_CSI_LEN {
                return unrecognized(raw);
            }
            next = self.read(raw).await;
        };

        let params = &raw[2..raw.len() - 1];

        if final_byte == ANSI_FUNCTION_KEY_TERMINATOR && params == PASTE_START_PARAMS {
            return self.decode_bracketed_paste(raw).await;
        }

        parse_csi_terminal_event(params, final_byte)
            .or_else(|| parse_csi_key(params, final_byte).map(InputEvent::from))
            .unwrap_or_else(|| unrecognized(raw))
    }

    /// `raw` is `ESC[200~`. Everything up to `ESC[201~` is pasted text, even bytes that
    /// would otherwise be escape sequences. If the input ends first, the text collected so
    /// far is returned.
    async fn decode_bracketed_paste(&mut self, raw: &mut Vec<u8>) -> InputEvent {
        let start = raw.len();
        let end = loop {
            if raw[start..].ends_with(PASTE_END_SEQUENCE) {
                break raw.len() - PASTE_END_SEQUENCE.len();
            }
            if self.read(raw).await.is_none() {
                break raw.len();
            }
        };
        InputEvent::Paste(String::from_utf8_lossy(&raw[start..end]).into_owned())
    }

    /// `raw` is `[ESC, ]]`. Collects until `ST` (`ESC \`) or `BEL`.
    async fn decode_osc(&mut self, raw: &mut Vec<u8>) -> Option<InputEvent> {
        let terminator_len = loop {
            if raw.len() >= MAX_OSC_LEN {
                return Some(unrecognized(raw));
            }
            match self.read(raw).await {
                None => return Some(unrecognized(raw)),
                Some(ANSI_BEL) => break 1,
                Some(ANSI_ESC) => match self.read(raw).await {
                    Some(ANSI_ST_BACKSLASH) => break 2,
                    Some(_) => {
                        // Not a terminator. The ESC starts the next event.
                        self.unread(raw);
                        self.unread(raw);
                        return Some(unrecognized(raw));
                    }
                    None => {
                        self.unread(raw);
                        return Some(unrecognized(raw));
                    }
                },
                Some(_) => {}
            }
        };

        let payload = &raw[2..raw.len() - terminator_len];

        if let Some(color) = parse_background_color(payload) {
            return Some(InputEvent::BackgroundColor(color));
        }

        if payload.starts_with(OSC_BACKGROUND_COLOR_CODE) {
            tracing::trace!(
                message = "EventDecoder -> dropping malformed background color reply",
                payload = ?String::from_utf8_lossy(payload)
            );
            return None;
        }

        Some(unrecognized(raw))
    }

    /// `raw` holds a lead byte `>= 0x80`.
    async fn decode_utf8(&mut self, raw: &mut Vec<u8>) -> InputEvent {
        let Some(len) = raw.first().copied().and_then(utf8_sequence_len) else {
            return unrecognized(raw);
        };

        while raw.len() < len {
            match self.read(raw).await {
                None => return unrecognized(raw),
                Some(byte) if !is_utf8_continuation_byte(byte) => {
                    self.unread(raw);
                    return unrecognized(raw);
                }
                Some(_) => {}
            }
        }

        decode_utf8_char(raw).map_or_else(
            || unrecognized(raw),
            |ch| InputEvent::from(KeyCode::Char(ch)),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CsiByte {
    Payload,
    Final,
    Invalid,
}

impl CsiByte {
    fn classify(byte: u8) -> Self {
        match byte {
            _ if CSI_PARAM_BYTE_RANGE.contains(&byte)
                || CSI_INTERMEDIATE_BYTE_RANGE.contains(&byte) =>
            {
                CsiByte::Payload
            }
            b'@'..=b'Z' | ANSI_FUNCTION_KEY_TERMINATOR => CsiByte::Final,
            b'['..=b'}' => CsiByte::Payload,
            _ => CsiByte::Invalid,
        }
    }
}

fn alt(code: KeyCode) -> InputEvent {
    InputEvent::Key(KeyPress::with_modifiers(code, KeyModifiers::ALT))
}

fn unrecognized(raw: &[u8]) -> InputEvent { InputEvent::UnrecognizedSequence(raw.to_vec()) }

/// Decode a complete byte slice without a runtime. Since the input is finite, a trailing
/// `ESC` decodes as the Escape key.
#[must_use]
pub fn decode_all(bytes: &[u8]) -> Vec<InputEvent> {
    let (decoded, _) = decode_all_with_spans(bytes);
    decoded.into_iter().map(|it| it.event).collect()
}

/// Like [`decode_all`], but returns each event's bytes, and the number of bytes that
/// were absorbed without an event.
#[must_use]
pub fn decode_all_with_spans(bytes: &[u8]) -> (Vec<DecodedEvent>, usize) {
    let mut decoder = EventDecoder::new(VecDeque::from(bytes.to_vec()));
    let mut acc = vec![];
    // A `VecDeque` source is always ready, so every call completes on the first poll.
    while let Some(decoded) = decoder.next_decoded().now_or_never().flatten() {
        acc.push(decoded);
    }
    (acc, decoder.absorbed_byte_count())
}
