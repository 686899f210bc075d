//! Background task that auto-releases holds past their deadline.
//!
//! The sweeper is a driver, not a state holder: all release semantics live
//! in the domain layer. It wakes on a fixed interval, asks the service to
//! release expired Active holds, and logs the outcome. At-least-once
//! semantics are free because releasing a non-Active hold is a no-op
//! rejection, so overlapping passes and racing explicit resolutions are
//! harmless.

use std::sync::Arc;
use std::time::Duration;

use super::LedgerService;

/// Periodic expiry sweeper over all wallets.
#[derive(Debug, Clone)]
pub struct ExpirySweeper {
    service: Arc<LedgerService>,
    interval: Duration,
}

impl ExpirySweeper {
    /// Creates a sweeper with the given pass interval.
    #[must_use]
    pub fn new(service: Arc<LedgerService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Runs the sweep loop forever. Spawn this on the runtime.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let outcome = self.service.sweep_expired().await;
            if outcome.released > 0 || outcome.failed > 0 {
                tracing::info!(
                    released = outcome.released,
                    failed = outcome.failed,
                    "expiry sweep pass complete"
                );
            } else {
                tracing::debug!("expiry sweep pass found nothing to release");
            }
        }
    }
}
