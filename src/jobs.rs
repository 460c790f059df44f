use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use crate::store::Store;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Hourly sweep permanently removing items past the restore window. Runs
/// until the shutdown channel signals; failures are logged, not retried.
pub async fn run_item_cleanup(store: Store, mut shutdown: watch::Receiver<()>) {
    let mut ticker = interval(SWEEP_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately; the sweep should start one
    // interval from now
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match store.cleanup_deleted_items().await {
                    Ok(0) => {}
                    Ok(removed) => log::info!("cleanup removed {} expired items", removed),
                    Err(err) => log::error!("cleanup failed: {}", err),
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}
