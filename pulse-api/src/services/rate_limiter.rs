//! Per-client sliding-window admission control
//!
//! Each client id owns an ordered list of admission timestamps. An
//! admission check prunes entries older than the window, then either
//! records the attempt or denies it with the number of seconds until the
//! oldest remaining entry leaves the window. Denial is a normal outcome,
//! not an error; denied attempts are never recorded.
//!
//! The limiter is constructed once at startup and shared through
//! `AppState`. The map lock is only held for the duration of one
//! admission check and never across the AI or persistence awaits.
//! State is process-local: running multiple instances multiplies the
//! effective limit.

use std::collections::HashMap;
use tokio::sync::Mutex;

/// Sliding window duration in milliseconds
pub const WINDOW_MS: i64 = 60_000;

/// Maximum admissions per client within one window
pub const MAX_PER_WINDOW: usize = 5;

/// Outcome of an admission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Denied { retry_after_secs: i64 },
}

/// Sliding-window rate limiter keyed by client id
pub struct SlidingWindowLimiter {
    windows: Mutex<HashMap<String, Vec<i64>>>,
    window_ms: i64,
    max_per_window: usize,
}

impl SlidingWindowLimiter {
    pub fn new() -> Self {
        Self::with_limits(WINDOW_MS, MAX_PER_WINDOW)
    }

    pub fn with_limits(window_ms: i64, max_per_window: usize) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            window_ms,
            max_per_window,
        }
    }

    /// Check whether a request from `client_id` at `now_ms` may proceed.
    ///
    /// A timestamp is stale once `now_ms - ts >= window_ms`, so a client
    /// whose oldest admission sits exactly one window back is admitted.
    pub async fn admit(&self, client_id: &str, now_ms: i64) -> Admission {
        let mut windows = self.windows.lock().await;
        let stamps = windows.entry(client_id.to_string()).or_default();

        stamps.retain(|&ts| now_ms - ts < self.window_ms);

        if stamps.len() >= self.max_per_window {
            // Oldest entry bounds how long the client must wait.
            let oldest = stamps[0];
            let wait_ms = self.window_ms - (now_ms - oldest);
            let retry_after_secs = ((wait_ms + 999) / 1000).max(0);
            tracing::debug!(client_id, retry_after_secs, "Admission denied");
            return Admission::Denied { retry_after_secs };
        }

        stamps.push(now_ms);
        Admission::Allowed
    }

    /// Remove client entries whose window has fully emptied.
    ///
    /// Without this pass the map grows for every client id ever seen.
    /// Returns the number of evicted clients.
    pub async fn sweep(&self, now_ms: i64) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, stamps| {
            stamps.retain(|&ts| now_ms - ts < self.window_ms);
            !stamps.is_empty()
        });
        before - windows.len()
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.windows.lock().await.len()
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new()
    }
}
