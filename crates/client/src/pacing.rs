//! Inter-call pacing.
//!
//! The remote API is rate limited and the connector runs strictly
//! sequentially, so calls are spaced with a pause instead of being retried
//! or fanned out. The trait keeps call sites unchanged if a deployment
//! swaps in adaptive pacing later.

use std::time::Duration;

use async_trait::async_trait;

/// Pause between record-write batches.
pub const BATCH_PAUSE: Duration = Duration::from_millis(1000);

/// Pause between record pages.
pub const PAGE_PAUSE: Duration = Duration::from_millis(500);

/// Spacing discipline between sequential API calls.
#[async_trait]
pub trait Pacing: Send + Sync {
    /// Suspend until the next call may be issued.
    async fn pause(&self);
}

/// Fixed-interval pacing: every pause sleeps the same duration.
pub struct FixedInterval(pub Duration);

#[async_trait]
impl Pacing for FixedInterval {
    async fn pause(&self) {
        tokio::time::sleep(self.0).await;
    }
}

/// No pacing at all. For tests and callers that own their own scheduling.
pub struct NoDelay;

#[async_trait]
impl Pacing for NoDelay {
    async fn pause(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fixed_interval_pauses_for_the_configured_duration() {
        let pacing = FixedInterval(Duration::from_millis(750));
        let before = tokio::time::Instant::now();
        pacing.pause().await;
        assert_eq!(before.elapsed(), Duration::from_millis(750));
    }

    #[tokio::test(start_paused = true)]
    async fn no_delay_returns_immediately() {
        let before = tokio::time::Instant::now();
        NoDelay.pause().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
