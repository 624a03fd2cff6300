// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words tcgetattr tcsetattr tcgetwinsize isatty VMIN VTIME ICANON ISIG

//! Unix/Linux/macOS terminal device, using rustix's safe termios API.

use super::TerminalDevice;
use crate::Size;
use rustix::termios::{self, LocalModes, OptionalActions, SpecialCodeIndex, Termios};
use std::{io, sync::atomic::AtomicBool};

/// Process wide, since all [`StdinTerminal`] values refer to the same file descriptor.
static STDIN_CAPTURE_FLAG: AtomicBool = AtomicBool::new(false);

/// The process's controlling terminal, reached through `stdin`.
///
/// Unlike `crossterm`, this does not fall back to `/dev/tty` when `stdin` is
/// redirected: the bytes to decode come from `stdin`, so it must be the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinTerminal;

impl TerminalDevice for StdinTerminal {
    type Attributes = Termios;

    fn is_terminal(&self) -> bool { termios::isatty(io::stdin()) }

    fn get_attributes(&self) -> io::Result<Termios> {
        Ok(termios::tcgetattr(io::stdin())?)
    }

    fn set_attributes(&self, attributes: &Termios) -> io::Result<()> {
        Ok(termios::tcsetattr(
            io::stdin(),
            OptionalActions::Now,
            attributes,
        )?)
    }

    /// Unlike `cfmakeraw` (rustix's [`Termios::make_raw`]), only line buffering, echo,
    /// and signal generation are turned off. Output processing stays on, so `\n` still
    /// moves to the start of the next line.
    fn make_raw(&self, original: &Termios) -> Termios {
        let mut raw = original.clone();
        raw.local_modes
            .remove(LocalModes::ICANON | LocalModes::ECHO | LocalModes::ISIG);
        raw.special_codes[SpecialCodeIndex::VMIN] = 1;
        raw.special_codes[SpecialCodeIndex::VTIME] = 0;
        raw
    }

    fn window_size(&self) -> Option<Size> {
        let winsize = termios::tcgetwinsize(io::stdout())
            .or_else(|_| termios::tcgetwinsize(io::stdin()))
            .ok()?;
        (winsize.ws_row > 0 && winsize.ws_col > 0).then_some(Size {
            rows: winsize.ws_row,
            columns: winsize.ws_col,
        })
    }

    fn capture_flag(&self) -> &AtomicBool { &STDIN_CAPTURE_FLAG }
}
