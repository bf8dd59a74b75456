//! Periodic background refresh of the cached snapshot

use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use crate::services::pipeline::AggregationPipeline;

/// Run one refresh, logging instead of failing
pub async fn run_refresh(pipeline: &AggregationPipeline) -> bool {
    match pipeline.refresh().await {
        Ok(snapshot) => {
            tracing::info!(
                "Scheduled refresh complete: {} channels from {} sources",
                snapshot.total_channels(),
                snapshot.source_stats.len()
            );
            true
        }
        Err(e) => {
            tracing::error!("Scheduled refresh failed: {:#}", e);
            false
        }
    }
}

/// Start the background refresh task
///
/// The first tick fires immediately, then every `interval_secs`.
/// This should be spawned as a background task using `tokio::spawn`.
pub async fn start_refresh_task(pipeline: Arc<AggregationPipeline>, interval_secs: u64) {
    tracing::info!("Starting refresh task (interval: {}s)", interval_secs);

    let mut interval = time::interval(Duration::from_secs(interval_secs.max(1)));

    loop {
        interval.tick().await;
        run_refresh(&pipeline).await;
    }
}
