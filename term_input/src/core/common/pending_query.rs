// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{sync::OnceLock, time::Duration};
use tokio::sync::Notify;

/// Single assignment result cell for the answer to a terminal query (window size,
/// background color).
///
/// - The first call to [`Self::fulfill`] wins. Later writes are no-ops that return
///   `false`.
/// - Any number of tasks can wait on it with [`Self::wait_for`], which is always bounded
///   by a timeout since the terminal may never answer.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use std::time::Duration;
/// use term_input::PendingQuery;
///
/// let query = PendingQuery::<u16>::new();
/// assert!(query.fulfill(80));
/// assert!(!query.fulfill(100));
/// assert_eq!(query.wait_for(Duration::from_millis(10)).await, Some(80));
/// # }
/// ```
#[derive(Debug)]
pub struct PendingQuery<T> {
    value: OnceLock<T>,
    notify: Notify,
}

impl<T: Clone> Default for PendingQuery<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Clone> PendingQuery<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: OnceLock::new(),
            notify: Notify::new(),
        }
    }

    /// Stores `value` if nothing was stored yet, and wakes all waiters. Returns `true` if
    /// this call stored the value.
    pub fn fulfill(&self, value: T) -> bool {
        let stored = self.value.set(value).is_ok();
        if stored {
            self.notify.notify_waiters();
        }
        stored
    }

    #[must_use]
    pub fn try_get(&self) -> Option<T> { self.value.get().cloned() }

    #[must_use]
    pub fn is_fulfilled(&self) -> bool { self.value.get().is_some() }

    /// Waits at most `timeout` for the value. Returns `None` if it did not arrive in time.
    pub async fn wait_for(&self, timeout: Duration) -> Option<T> {
        let wait = async {
            loop {
                // Register interest before checking, so a fulfill that lands in between
                // is not missed.
                let notified = self.notify.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                if let Some(value) = self.try_get() {
                    return value;
                }
                notified.await;
            }
        };
        tokio::time::timeout(timeout, wait).await.ok()
    }

    /// Like [`Self::wait_for`], but returns `fallback` on timeout.
    pub async fn get_or(&self, timeout: Duration, fallback: T) -> T {
        self.wait_for(timeout).await.unwrap_or(fallback)
    }
}
