//! Delayed resumption between query rounds
//!
//! The finder never blocks a thread between rounds. It awaits a
//! `Scheduler`, which yields back to the runtime until the interval elapses.

use async_trait::async_trait;
use std::time::Duration;

/// Source of the delay between two rounds
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Resolve once `interval` has elapsed
    async fn delay(&self, interval: Duration);
}

/// Scheduler backed by the tokio timer wheel
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn delay(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}
