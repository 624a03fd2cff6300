// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{PendingQuery, Rgb16, Size};
use std::{sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError},
          time::Duration};

/// Answers to the terminal queries, written by the input pump as the reports arrive, and
/// read by [`TerminalHandle`].
///
/// The window size can change, so its query is re-armed on every `SIGWINCH`: the old
/// [`PendingQuery`] stays fulfilled (anyone holding it keeps the old answer), and new
/// waiters get a fresh one. The last reported size is also cached. The background color
/// is asked for once per session.
///
/// [`TerminalHandle`]: crate::TerminalHandle
#[derive(Debug, Default)]
pub struct TerminalQueries {
    size: StdMutex<SizeState>,
    background_color: PendingQuery<Rgb16>,
}

#[derive(Debug, Default)]
struct SizeState {
    last_reported: Option<Size>,
    pending: Arc<PendingQuery<Size>>,
}

impl TerminalQueries {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn record_size(&self, size: Size) {
        let mut state = self.lock_size();
        state.last_reported = Some(size);
        // First report after a re-arm answers the query, every report updates the cache.
        state.pending.fulfill(size);
    }

    /// Start waiting for a new size report. No-op if the current query is still open.
    pub fn rearm_size(&self) {
        let mut state = self.lock_size();
        if state.pending.is_fulfilled() {
            state.pending = Arc::new(PendingQuery::new());
        }
    }

    /// The last size the terminal reported, even if a newer report is expected.
    #[must_use]
    pub fn last_reported_size(&self) -> Option<Size> { self.lock_size().last_reported }

    /// The answer to the current size query, if it arrived.
    #[must_use]
    pub fn current_size(&self) -> Option<Size> { self.lock_size().pending.try_get() }

    /// Waits up to `timeout` for the answer to the current size query.
    pub async fn wait_for_size(&self, timeout: Duration) -> Option<Size> {
        let pending = self.lock_size().pending.clone();
        pending.wait_for(timeout).await
    }

    /// Only the first report counts. Returns `true` if this one was recorded.
    pub fn record_background_color(&self, color: Rgb16) -> bool {
        self.background_color.fulfill(color)
    }

    #[must_use]
    pub fn background_color(&self) -> Option<Rgb16> { self.background_color.try_get() }

    pub async fn wait_for_background_color(&self, timeout: Duration) -> Option<Rgb16> {
        self.background_color.wait_for(timeout).await
    }

    fn lock_size(&self) -> MutexGuard<'_, SizeState> {
        self.size.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SHORT: Duration = Duration::from_millis(10);

    #[tokio::test]
    async fn test_size_report_answers_waiters() {
        let queries = Arc::new(TerminalQueries::new());
        let queries_clone = queries.clone();
        let waiter = tokio::spawn(async move {
            queries_clone.wait_for_size(Duration::from_secs(5)).await
        });
        tokio::task::yield_now().await;

        queries.record_size(Size { rows: 40, columns: 100 });
        assert_eq!(waiter.await.unwrap(), Some(Size { rows: 40, columns: 100 }));
        assert_eq!(queries.current_size(), Some(Size { rows: 40, columns: 100 }));
    }

    #[tokio::test]
    async fn test_rearm_keeps_last_reported_and_opens_new_query() {
        let queries = TerminalQueries::new();
        queries.record_size(Size { rows: 24, columns: 80 });

        queries.rearm_size();
        assert_eq!(queries.current_size(), None);
        assert_eq!(queries.last_reported_size(), Some(Size { rows: 24, columns: 80 }));
        assert_eq!(queries.wait_for_size(SHORT).await, None);

        queries.record_size(Size { rows: 30, columns: 90 });
        assert_eq!(queries.current_size(), Some(Size { rows: 30, columns: 90 }));
        assert_eq!(queries.last_reported_size(), Some(Size { rows: 30, columns: 90 }));
    }

    #[test]
    fn test_rearm_twice_keeps_open_query() {
        let queries = TerminalQueries::new();
        queries.rearm_size();
        queries.rearm_size();
        queries.record_size(Size { rows: 1, columns: 2 });
        assert_eq!(queries.current_size(), Some(Size { rows: 1, columns: 2 }));
    }

    #[test]
    fn test_reports_while_armed_update_cache_only() {
        let queries = TerminalQueries::new();
        queries.record_size(Size { rows: 10, columns: 10 });
        queries.record_size(Size { rows: 20, columns: 20 });
        assert_eq!(queries.current_size(), Some(Size { rows: 10, columns: 10 }));
        assert_eq!(queries.last_reported_size(), Some(Size { rows: 20, columns: 20 }));
    }

    #[tokio::test]
    async fn test_background_color_first_write_wins() {
        let queries = TerminalQueries::new();
        assert_eq!(queries.wait_for_background_color(SHORT).await, None);
        assert!(queries.record_background_color(Rgb16::new(0, 0, 0)));
        assert!(!queries.record_background_color(Rgb16::new(1, 1, 1)));
        assert_eq!(queries.background_color(), Some(Rgb16::new(0, 0, 0)));
    }
}
