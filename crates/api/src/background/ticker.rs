//! Periodic fleet ticks.
//!
//! One loop drives every scheduled tick, and each tick holds the controller
//! lock until it completes, so ticks never overlap.

use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::controller::SharedController;
use crate::source::SnapshotSource;

/// Run the tick loop until `cancel` is triggered.
///
/// The interval's immediate first tick is consumed up front; the initial
/// snapshot is loaded at startup, so the first scheduled tick happens one
/// `period` later.
pub async fn run(
    controller: SharedController,
    mut source: Box<dyn SnapshotSource>,
    period: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        source = source.name(),
        interval_secs = period.as_secs(),
        "Fleet ticker started"
    );

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Fleet ticker stopping");
                break;
            }
            _ = interval.tick() => {
                let mut guard = controller.lock().await;
                match guard.tick(source.as_mut(), Utc::now()).await {
                    Ok(state) => {
                        tracing::debug!(tick = state.tick_count, "Scheduled tick complete");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Scheduled tick failed");
                    }
                }
            }
        }
    }
}
