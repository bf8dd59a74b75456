//! Prometheus counters for the aggregation pipeline

use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};

lazy_static! {
    pub static ref REFRESH_RUNS: IntCounter = register_int_counter!(
        "m3u_aggregator_refresh_runs_total",
        "Number of aggregation refreshes performed"
    )
    .unwrap();
    pub static ref SOURCE_FETCH_FAILURES: IntCounter = register_int_counter!(
        "m3u_aggregator_source_fetch_failures_total",
        "Number of source fetches that degraded to zero channels"
    )
    .unwrap();
    pub static ref CHANNELS_AGGREGATED: IntCounter = register_int_counter!(
        "m3u_aggregator_channels_aggregated_total",
        "Number of channels produced by refreshes"
    )
    .unwrap();
}
