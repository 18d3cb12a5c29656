//! Injectable wait between status queries.

use std::time::Duration;

use async_trait::async_trait;

/// Suspends the calling task for a while.
///
/// Production code uses [`TokioSleeper`]; tests substitute an implementation
/// that records the requested durations and returns immediately.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration` without blocking other tasks.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
