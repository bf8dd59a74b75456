//! Fan-out over all sources and positional reassembly

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;

use crate::models::{AggregationSnapshot, Source, SourceStat};
use crate::services::fetcher::PlaylistFetcher;
use crate::services::metrics::{CHANNELS_AGGREGATED, REFRESH_RUNS};

/// Fetches every source concurrently and concatenates the results
#[derive(Clone)]
pub struct Aggregator {
    fetcher: Arc<dyn PlaylistFetcher>,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn PlaylistFetcher>) -> Self {
        Self { fetcher }
    }

    /// Aggregate `sources` in the given order.
    ///
    /// The caller filters for active sources. Channel order and stats follow
    /// the input order regardless of which fetch completes first; a failing
    /// source contributes zero channels.
    pub async fn aggregate(&self, sources: &[Source]) -> AggregationSnapshot {
        tracing::info!("Aggregating {} sources", sources.len());
        REFRESH_RUNS.inc();

        let per_source = join_all(
            sources
                .iter()
                .map(|source| self.fetcher.fetch(&source.name, &source.url)),
        )
        .await;

        let source_stats: Vec<SourceStat> = sources
            .iter()
            .zip(&per_source)
            .map(|(source, channels)| SourceStat {
                name: source.name.clone(),
                url: source.url.clone(),
                channel_count: channels.len(),
            })
            .collect();

        let channels: Vec<_> = per_source.into_iter().flatten().collect();

        tracing::info!("Total channels aggregated: {}", channels.len());
        CHANNELS_AGGREGATED.inc_by(channels.len() as u64);

        AggregationSnapshot {
            channels,
            source_stats,
            last_updated_at: Utc::now(),
        }
    }
}
