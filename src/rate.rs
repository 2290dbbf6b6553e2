//! Fixed-interval pacing between sends.

use std::future::Future;
use std::time::Duration;

/// How a pause ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Elapsed,
    Interrupted,
}

/// Sleeps a fixed interval between consecutive sends.
///
/// The interval is not adjusted for time spent generating or sending, so
/// the achieved rate is at most the configured one.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    interval: Duration,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait one interval, or less if `shutdown` completes first.
    pub async fn pause<S>(&self, shutdown: &mut S) -> Pause
    where
        S: Future<Output = ()> + Unpin,
    {
        tokio::select! {
            _ = tokio::time::sleep(self.interval) => Pause::Elapsed,
            _ = shutdown => Pause::Interrupted,
        }
    }
}
