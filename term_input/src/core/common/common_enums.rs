// Copyright (c) 2023-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Control flow signal for loops and threads.
///
/// A unified type for indicating whether a loop or thread should continue processing or
/// stop. Used across:
/// - [`stdin_reader_thread`] (reads bytes from `stdin`).
/// - [`signal_forwarder_thread`] (moves OS signals into a channel).
///
/// [`signal_forwarder_thread`]: mod@crate::terminal_session::signal_forwarder_thread
/// [`stdin_reader_thread`]: mod@crate::terminal_session::stdin_reader_thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Continuation {
    /// Continue to the next iteration.
    #[default]
    Continue,

    /// Stop processing and exit the loop/thread.
    Stop,
}
