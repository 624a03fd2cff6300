// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! VT-100 terminal input decoding.
//!
//! Converts the raw bytes that a terminal in raw mode sends (escape sequences, control
//! bytes, UTF-8 text) into [`InputEvent`]s. Decoding is total over the byte alphabet:
//! input that isn't understood becomes [`InputEvent::UnrecognizedSequence`], it never
//! stops the stream.
//!
//! ## Layers
//!
//! ```text
//! ByteSource (stdin chunks, or a VecDeque<u8> in tests)
//!    │  next_byte(), next_byte_within(esc_timeout)
//! ┌──▼───────────────────────────────────────┐
//! │  EventDecoder (pull loop + lookahead)    │  event_decoder.rs
//! │  • delimits ESC, CSI, SS3, OSC, paste    │
//! │  • pushes back bytes of the next event   │
//! └──┬───────────────────────────────────────┘
//!    │ (delegate interpretation of delimited bytes)
//! ┌──▼───────────────────────────────────────┐
//! │  pure parsers                            │
//! │  • parse_csi_key(), parse_ss3_key()      │  keyboard.rs
//! │  • parse_csi_terminal_event()            │  terminal_events.rs
//! │  • parse_background_color()              │  osc.rs
//! │  • utf8_sequence_len()                   │  utf8.rs
//! └──────────────────────────────────────────┘
//!    │
//!    ▼
//! InputEvent (key, focus, paste, window size, background color)
//! ```
//!
//! ## Sequences
//!
//! | Input                     | Event                                        |
//! | ------------------------- | -------------------------------------------- |
//! | `ESC` then silence        | `Key(Escape)`                                |
//! | `ESC x`                   | `Key(Char('x'))` with `ALT`                  |
//! | `ESC[A` .. `ESC[D`        | `Key(Up / Down / Right / Left)`              |
//! | `ESC[H`, `ESC[F`          | `Key(Home / End)`                            |
//! | `ESC[1;5D`                | `Key(Left)` with `CTRL`                      |
//! | `ESC[3~`, `ESC[3;2~`      | `Key(Delete)`, with `SHIFT`                  |
//! | `ESC[15~`, `ESC O P`      | `Key(Function(5))`, `Key(Function(1))`       |
//! | `ESC[I`, `ESC[O`          | `FocusGained`, `FocusLost`                   |
//! | `ESC[200~ text ESC[201~`  | `Paste("text")`                              |
//! | `ESC[24;80R`              | `WindowSize(24 x 80)`                        |
//! | `ESC]11;rgb:0/0/0 ESC\`   | `BackgroundColor(black)`                     |

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Conditionally public modules for documentation and testing.
// In test/doc builds: fully public (for rustdoc and test access)
// In release builds: private (encapsulated implementation details)
#[cfg(any(test, doc))]
pub mod keyboard;
#[cfg(not(any(test, doc)))]
mod keyboard;

#[cfg(any(test, doc))]
pub mod osc;
#[cfg(not(any(test, doc)))]
mod osc;

#[cfg(any(test, doc))]
pub mod terminal_events;
#[cfg(not(any(test, doc)))]
mod terminal_events;

#[cfg(any(test, doc))]
pub mod utf8;
#[cfg(not(any(test, doc)))]
mod utf8;

pub mod byte_source;
pub mod event_decoder;
pub mod types;

// Re-export types for flat public API.
pub use byte_source::*;
pub use event_decoder::*;
pub use keyboard::*;
pub use osc::*;
pub use terminal_events::*;
pub use types::*;
pub use utf8::*;
