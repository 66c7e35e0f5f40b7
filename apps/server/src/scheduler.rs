//! Background scheduler for periodic quote refresh.
//!
//! The first refresh happens in `build_state`, so the first tick here is one
//! full interval after startup.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Starts the background quote refresh scheduler.
pub fn start_quote_refresh_scheduler(state: Arc<AppState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_secs = period.as_secs(),
            "Quote refresh scheduler started"
        );

        let mut refresh_interval = interval_at(Instant::now() + period, period);
        // A tick missed while a slow fetch ran is not worth a burst of catch-up refreshes
        refresh_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            refresh_interval.tick().await;
            run_scheduled_refresh(&state).await;
        }
    })
}

/// Runs a single scheduled refresh.
async fn run_scheduled_refresh(state: &Arc<AppState>) {
    info!("Running scheduled quote refresh");

    let cache = &state.quote_cache;
    let before = cache.last_updated();
    cache.refresh().await;

    if cache.last_updated() == before {
        warn!(
            minutes_since_last_update = cache.minutes_since_last_update(),
            "Scheduled refresh did not update the cache"
        );
    }
}
