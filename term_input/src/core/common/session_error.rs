// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;

/// Errors that stop a [`TerminalSession`] from starting, or that happen while raw mode is
/// being acquired or released.
///
/// Decoding never fails (bad input becomes [`InputEvent::UnrecognizedSequence`]), and
/// query timeouts resolve to fallback values, so neither shows up here.
///
/// [`TerminalSession`]: crate::TerminalSession
/// [`InputEvent::UnrecognizedSequence`]: crate::InputEvent::UnrecognizedSequence
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum TerminalSessionError {
    /// Nothing was changed.
    #[error("stdin is not a terminal")]
    #[diagnostic(
        code(term_input::raw_mode::not_a_tty),
        help("Run the program in a terminal, without redirecting stdin")
    )]
    NotATty,

    #[error("{operation} failed")]
    #[diagnostic(code(term_input::raw_mode::syscall_failed))]
    SystemCallFailed {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Nothing was changed.
    #[error("the terminal is already in raw mode, owned by another session")]
    #[diagnostic(
        code(term_input::raw_mode::already_captured),
        help("Only one session can own the terminal at a time, shut the other one down first")
    )]
    SessionAlreadyCaptured,

    #[error("failed to start {what}")]
    #[diagnostic(
        code(term_input::session::spawn_failed),
        help("This usually means the system ran out of threads or file descriptors")
    )]
    SpawnFailed {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl TerminalSessionError {
    #[must_use]
    pub fn system_call_failed(operation: &'static str, source: std::io::Error) -> Self {
        Self::SystemCallFailed { operation, source }
    }

    #[must_use]
    pub fn spawn_failed(what: &'static str, source: std::io::Error) -> Self {
        Self::SpawnFailed { what, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display_and_code() {
        let error = TerminalSessionError::system_call_failed(
            "tcsetattr",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert_eq!(error.to_string(), "tcsetattr failed");
        assert_eq!(
            error.code().map(|it| it.to_string()),
            Some("term_input::raw_mode::syscall_failed".to_string())
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_not_a_tty_has_help() {
        assert!(TerminalSessionError::NotATty.help().is_some());
    }
}
