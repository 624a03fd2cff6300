// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::ESC_DISAMBIGUATION_TIMEOUT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(50);
pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_millis(250);

/// What a [`TerminalSession`] turns on, and how long it waits for things.
///
/// Every terminal feature is off by default. Durations are (de)serialized as whole
/// milliseconds, and missing fields take their default, so this can be embedded in a
/// host application's config file:
///
/// ```
/// use std::time::Duration;
/// use term_input::SessionConfig;
///
/// let config: SessionConfig =
///     serde_json::from_str(r#"{ "focus_detection": true, "query_timeout_ms": 100 }"#)
///         .unwrap();
/// assert!(config.focus_detection);
/// assert!(!config.bracketed_paste);
/// assert_eq!(config.query_timeout, Duration::from_millis(100));
/// ```
///
/// [`TerminalSession`]: crate::TerminalSession
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// `ESC[?2004h` on start, `ESC[?2004l` on teardown.
    pub bracketed_paste: bool,
    /// Ask for the background color (OSC 11) on start.
    pub background_color_detection: bool,
    /// `ESC[?1004h` on start, `ESC[?1004l` on teardown.
    pub focus_detection: bool,
    /// Ask for the window size on start and after every `SIGWINCH`.
    pub size_detection: bool,
    /// How long a lone `ESC` waits for the rest of a sequence.
    #[serde(rename = "esc_timeout_ms", with = "duration_millis")]
    pub esc_timeout: Duration,
    /// Upper bound for [`TerminalHandle::known_size`] and friends.
    ///
    /// [`TerminalHandle::known_size`]: crate::TerminalHandle::known_size
    #[serde(rename = "query_timeout_ms", with = "duration_millis")]
    pub query_timeout: Duration,
    /// How long shutdown waits for each task before aborting it.
    #[serde(rename = "join_timeout_ms", with = "duration_millis")]
    pub join_timeout: Duration,
    /// Signal numbers to forward in addition to `SIGWINCH`.
    pub extra_signals: Vec<i32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bracketed_paste: false,
            background_color_detection: false,
            focus_detection: false,
            size_detection: false,
            esc_timeout: ESC_DISAMBIGUATION_TIMEOUT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            join_timeout: DEFAULT_JOIN_TIMEOUT,
            extra_signals: vec![],
        }
    }
}

impl SessionConfig {
    /// Every terminal feature turned on.
    #[must_use]
    pub fn all_features() -> Self {
        Self {
            bracketed_paste: true,
            background_color_detection: true,
            focus_detection: true,
            size_detection: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_bracketed_paste(mut self, enabled: bool) -> Self {
        self.bracketed_paste = enabled;
        self
    }

    #[must_use]
    pub fn with_background_color_detection(mut self, enabled: bool) -> Self {
        self.background_color_detection = enabled;
        self
    }

    #[must_use]
    pub fn with_focus_detection(mut self, enabled: bool) -> Self {
        self.focus_detection = enabled;
        self
    }

    #[must_use]
    pub fn with_size_detection(mut self, enabled: bool) -> Self {
        self.size_detection = enabled;
        self
    }

    #[must_use]
    pub fn with_esc_timeout(mut self, timeout: Duration) -> Self {
        self.esc_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_extra_signal(mut self, signal_number: i32) -> Self {
        self.extra_signals.push(signal_number);
        self
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert!(!config.bracketed_paste);
        assert!(!config.background_color_detection);
        assert!(!config.focus_detection);
        assert!(!config.size_detection);
        assert_eq!(config.esc_timeout, Duration::from_millis(30));
        assert_eq!(config.query_timeout, Duration::from_millis(50));
        assert_eq!(config.join_timeout, Duration::from_millis(250));
        assert!(config.extra_signals.is_empty());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_serialized_field_names() {
        let config = SessionConfig::all_features()
            .with_esc_timeout(Duration::from_millis(15))
            .with_extra_signal(10);
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "bracketed_paste": true,
                "background_color_detection": true,
                "focus_detection": true,
                "size_detection": true,
                "esc_timeout_ms": 15,
                "query_timeout_ms": 50,
                "join_timeout_ms": 250,
                "extra_signals": [10],
            })
        );
        let round_tripped: SessionConfig = serde_json::from_value(value).unwrap();
        assert_eq!(round_tripped, config);
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::default()
            .with_bracketed_paste(true)
            .with_focus_detection(true)
            .with_query_timeout(Duration::from_millis(5))
            .with_join_timeout(Duration::from_secs(1));
        assert!(config.bracketed_paste);
        assert!(config.focus_detection);
        assert!(!config.size_detection);
        assert_eq!(config.query_timeout, Duration::from_millis(5));
        assert_eq!(config.join_timeout, Duration::from_secs(1));
    }
}
