//! Refresh schedule for the polling coordinator

use super::coordinator::{PollingCoordinator, TickOutcome};
use log::{debug, trace};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

/// Run the refresh loop until the task is aborted
///
/// The first tick fires one period from now, since setup has already done
/// the initial refresh. Ticks that come due while a refresh is still running
/// are dropped rather than queued.
pub async fn run(coordinator: Arc<PollingCoordinator>, period: Duration) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    debug!(
        "Starting {} refresh schedule every {:?}",
        coordinator.name(),
        period
    );

    loop {
        interval.tick().await;

        let start = Instant::now();
        let outcome = coordinator.tick().await;
        trace!(
            "{} refresh tick finished with {:?} in {:?}",
            coordinator.name(),
            outcome,
            start.elapsed()
        );

        if outcome == TickOutcome::Skipped {
            debug!("{} refresh still in flight, tick skipped", coordinator.name());
        }
    }
}
