// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DEFAULT_WINDOW_SIZE, OutputDevice, Rgb16, SessionConfig, Size, TerminalQueries};
use std::{fmt, io, sync::Arc, time::Duration};

/// Asks the OS for the window size (an `ioctl`), as the last resort before the default.
pub type WindowSizeProbe = Arc<dyn Fn() -> Option<Size> + Send + Sync>;

/// Cheap to clone view of a running [`TerminalSession`], passed explicitly to the code
/// that needs it.
///
/// None of the `known_*` methods fail, and none of them waits longer than
/// [`SessionConfig::query_timeout`]. Once the session is shut down they keep returning
/// the last known answers.
///
/// [`TerminalSession`]: crate::TerminalSession
#[derive(Clone)]
pub struct TerminalHandle {
    queries: Arc<TerminalQueries>,
    output: OutputDevice,
    window_size_probe: WindowSizeProbe,
    query_timeout: Duration,
    is_size_detection_enabled: bool,
    is_background_color_detection_enabled: bool,
}

impl TerminalHandle {
    pub(crate) fn new(
        queries: Arc<TerminalQueries>,
        output: OutputDevice,
        window_size_probe: WindowSizeProbe,
        config: &SessionConfig,
    ) -> Self {
        Self {
            queries,
            output,
            window_size_probe,
            query_timeout: config.query_timeout,
            is_size_detection_enabled: config.size_detection,
            is_background_color_detection_enabled: config.background_color_detection,
        }
    }

    /// In order of preference:
    /// 1. The latest size report. After a resize this is the old size until the
    ///    terminal answers the new query.
    /// 2. The answer to the first query, waiting up to the query timeout. Only when size
    ///    detection is on, otherwise nobody asked.
    /// 3. The window size from the OS.
    /// 4. [`DEFAULT_WINDOW_SIZE`].
    pub async fn known_size(&self) -> Size {
        if let Some(size) = self.queries.last_reported_size() {
            return size;
        }

        if self.is_size_detection_enabled
            && let Some(size) = self.queries.wait_for_size(self.query_timeout).await
        {
            return size;
        }

        (self.window_size_probe)().unwrap_or(DEFAULT_WINDOW_SIZE)
    }

    pub async fn known_rows(&self) -> u16 { self.known_size().await.rows }

    pub async fn known_columns(&self) -> u16 { self.known_size().await.columns }

    /// `None` if background color detection is off, or the terminal didn't answer in
    /// time.
    pub async fn background_color(&self) -> Option<Rgb16> {
        if self.is_background_color_detection_enabled {
            self.queries
                .wait_for_background_color(self.query_timeout)
                .await
        } else {
            self.queries.background_color()
        }
    }

    pub async fn is_dark_background(&self) -> Option<bool> {
        self.background_color().await.map(|color| color.is_dark())
    }

    /// Send bytes to the terminal as they are. Remember that raw mode needs `\r\n`.
    ///
    /// # Errors
    ///
    /// Returns the error from the output device.
    pub fn write_raw(&self, bytes: &[u8]) -> io::Result<()> {
        self.output.write_bytes(bytes)
    }

    /// # Errors
    ///
    /// Returns the error from the output device.
    pub fn write_str(&self, text: &str) -> io::Result<()> { self.write_raw(text.as_bytes()) }
}

impl fmt::Debug for TerminalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalHandle")
            .field("queries", &self.queries)
            .field("query_timeout", &self.query_timeout)
            .field("is_size_detection_enabled", &self.is_size_detection_enabled)
            .field(
                "is_background_color_detection_enabled",
                &self.is_background_color_detection_enabled,
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputDeviceExt;
    use pretty_assertions::assert_eq;
    use std::time::Instant;

    fn handle_for(
        config: &SessionConfig,
        probe: Option<Size>,
    ) -> (TerminalHandle, Arc<TerminalQueries>) {
        let queries = Arc::new(TerminalQueries::new());
        let (output, _stdout_mock) = OutputDevice::new_mock();
        let handle =
            TerminalHandle::new(queries.clone(), output, Arc::new(move || probe), config);
        (handle, queries)
    }

    #[tokio::test]
    async fn test_known_columns_without_any_answer_is_the_default() {
        let config = SessionConfig::default()
            .with_size_detection(true)
            .with_query_timeout(Duration::from_millis(50));
        let (handle, _queries) = handle_for(&config, None);

        let start = Instant::now();
        assert_eq!(handle.known_columns().await, DEFAULT_WINDOW_SIZE.columns);
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(handle.known_rows().await, DEFAULT_WINDOW_SIZE.rows);
    }

    #[tokio::test]
    async fn test_probe_is_used_when_nobody_answers() {
        let (handle, _queries) =
            handle_for(&SessionConfig::default(), Some(Size { rows: 33, columns: 111 }));
        assert_eq!(handle.known_size().await, Size { rows: 33, columns: 111 });
    }

    #[tokio::test]
    async fn test_report_beats_probe() {
        let (handle, queries) =
            handle_for(&SessionConfig::default(), Some(Size { rows: 33, columns: 111 }));
        queries.record_size(Size { rows: 50, columns: 200 });
        assert_eq!(handle.known_size().await, Size { rows: 50, columns: 200 });
    }

    #[tokio::test]
    async fn test_cached_report_is_returned_after_rearm_without_waiting() {
        let config = SessionConfig::default()
            .with_size_detection(true)
            .with_query_timeout(Duration::from_secs(30));
        let (handle, queries) =
            handle_for(&config, Some(Size { rows: 33, columns: 111 }));
        queries.record_size(Size { rows: 50, columns: 200 });
        queries.rearm_size();

        let start = Instant::now();
        assert_eq!(handle.known_size().await, Size { rows: 50, columns: 200 });
        assert!(start.elapsed() < Duration::from_secs(2));

        queries.record_size(Size { rows: 60, columns: 210 });
        assert_eq!(handle.known_size().await, Size { rows: 60, columns: 210 });
    }

    #[tokio::test]
    async fn test_first_answer_is_awaited_when_detection_is_on() {
        let config = SessionConfig::default()
            .with_size_detection(true)
            .with_query_timeout(Duration::from_secs(30));
        let (handle, queries) =
            handle_for(&config, Some(Size { rows: 33, columns: 111 }));

        let answer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            queries.record_size(Size { rows: 45, columns: 150 });
        });
        assert_eq!(handle.known_size().await, Size { rows: 45, columns: 150 });
        answer.await.unwrap();
    }

    #[tokio::test]
    async fn test_background_color_without_detection_does_not_wait() {
        let config = SessionConfig::default().with_query_timeout(Duration::from_secs(30));
        let (handle, _queries) = handle_for(&config, None);
        let start = Instant::now();
        assert_eq!(handle.is_dark_background().await, None);
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_dark_and_light_background() {
        let config = SessionConfig::default().with_background_color_detection(true);
        let (handle, queries) = handle_for(&config, None);
        queries.record_background_color(Rgb16::new(0xffff, 0xffff, 0xffff));
        assert_eq!(handle.is_dark_background().await, Some(false));

        let (handle, queries) = handle_for(&config, None);
        queries.record_background_color(Rgb16::new(0, 0, 0));
        assert_eq!(handle.is_dark_background().await, Some(true));
    }
}
