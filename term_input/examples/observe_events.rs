// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Prints every event that the terminal sends, until `q` or `Ctrl+C` is pressed.
//!
//! ```sh
//! cargo run --example observe_events -- --all --log-file /tmp/term_input_log.txt
//! ```

use clap::Parser;
use miette::IntoDiagnostic;
use std::time::Duration;
use term_input::{InputEvent, KeyCode, SessionConfig, TerminalSession, TracingConfig,
                 try_initialize_logging_global};
use tracing_core::LevelFilter;

/// Put the terminal in raw mode and print the decoded input events.
#[derive(Debug, Parser)]
#[command(name = "observe_events", version)]
#[allow(clippy::struct_excessive_bools)]
struct CLIArg {
    /// Turn on every terminal feature
    #[arg(long, short = 'a')]
    all: bool,

    /// Report pasted text as one event
    #[arg(long)]
    bracketed_paste: bool,

    /// Report focus gained / lost
    #[arg(long)]
    focus: bool,

    /// Ask the terminal for its size, on start and on every resize
    #[arg(long)]
    size: bool,

    /// Ask the terminal for its background color
    #[arg(long)]
    background_color: bool,

    /// How long a lone ESC waits for the rest of a sequence
    #[arg(long, default_value_t = 30)]
    esc_timeout_ms: u64,

    /// Write debug logs to this file (stdout is taken by raw mode)
    #[arg(long, short = 'l', value_name = "PATH")]
    log_file: Option<String>,
}

impl CLIArg {
    fn to_session_config(&self) -> SessionConfig {
        let config = if self.all {
            SessionConfig::all_features()
        } else {
            SessionConfig::default()
                .with_bracketed_paste(self.bracketed_paste)
                .with_focus_detection(self.focus)
                .with_size_detection(self.size)
                .with_background_color_detection(self.background_color)
        };
        config.with_esc_timeout(Duration::from_millis(self.esc_timeout_ms))
    }
}

fn is_quit(event: &InputEvent) -> bool {
    matches!(
        event,
        InputEvent::Key(key)
            if key.code == KeyCode::Char('q') || key.code == KeyCode::Control('C')
    )
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli_arg = CLIArg::parse();

    if let Some(log_file) = &cli_arg.log_file {
        try_initialize_logging_global(TracingConfig::new_file(
            Some(log_file.clone()),
            LevelFilter::DEBUG,
        ))?;
    }

    let config = cli_arg.to_session_config();
    tracing::info!(message = "observe_events -> starting", ?config);

    TerminalSession::run_scoped(config, async move |handle, mut events| {
        let size = handle.known_size().await;
        handle
            .write_str(&format!(
                "{} x {}, dark background: {:?}. Press q or Ctrl+C to quit.\r\n",
                size.columns,
                size.rows,
                handle.is_dark_background().await
            ))
            .into_diagnostic()?;

        while let Some(event) = events.next().await {
            if is_quit(&event) {
                break;
            }
            handle.write_str(&format!("{event:?}\r\n")).into_diagnostic()?;
        }

        Ok::<(), miette::Report>(())
    })
    .await??;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_all_turns_everything_on() {
        let cli_arg =
            CLIArg::parse_from(["observe_events", "--all", "--esc-timeout-ms", "5"]);
        assert_eq!(
            cli_arg.to_session_config(),
            SessionConfig::all_features().with_esc_timeout(Duration::from_millis(5))
        );
    }

    #[test]
    fn test_cli_single_features() {
        let cli_arg = CLIArg::parse_from(["observe_events", "--focus", "--size"]);
        let config = cli_arg.to_session_config();
        assert!(config.focus_detection);
        assert!(config.size_detection);
        assert!(!config.bracketed_paste);
        assert!(!config.background_color_detection);
    }

    #[test]
    fn test_quit_keys() {
        assert!(is_quit(&KeyCode::Char('q').into()));
        assert!(is_quit(&KeyCode::Control('C').into()));
        assert!(!is_quit(&KeyCode::Char('Q').into()));
    }
}
