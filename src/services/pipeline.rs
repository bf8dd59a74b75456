//! Fetch → parse → merge → cache, and the cached-or-fresh decision

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::models::AggregationSnapshot;
use crate::services::aggregator::Aggregator;
use crate::services::store::{CacheStore, SourceRegistry};

/// Ties the registry, the aggregator and the snapshot cache together
pub struct AggregationPipeline {
    registry: Arc<dyn SourceRegistry>,
    cache: Arc<dyn CacheStore>,
    aggregator: Aggregator,
}

impl AggregationPipeline {
    pub fn new(
        registry: Arc<dyn SourceRegistry>,
        cache: Arc<dyn CacheStore>,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            registry,
            cache,
            aggregator,
        }
    }

    /// Aggregate all active sources and replace the cached snapshot
    pub async fn refresh(&self) -> Result<AggregationSnapshot> {
        tracing::info!("Starting M3U aggregation and caching...");

        let sources = self
            .registry
            .list_active_sources()
            .await
            .context("Failed to fetch sources from database")?;
        tracing::info!("Found {} active sources", sources.len());

        let snapshot = self.aggregator.aggregate(&sources).await;

        self.cache
            .save(&snapshot)
            .await
            .context("Failed to cache aggregated channels")?;

        Ok(snapshot)
    }

    /// Cached snapshot unless `refresh` is set or the cache misses
    pub async fn snapshot(&self, refresh: bool) -> Result<AggregationSnapshot> {
        if !refresh {
            if let Some(cached) = self
                .cache
                .load()
                .await
                .context("Failed to load cached snapshot")?
            {
                tracing::info!("Serving cached snapshot ({} channels)", cached.total_channels());
                return Ok(cached);
            }
            tracing::info!("No valid cached snapshot, refreshing");
        }

        self.refresh().await
    }

    pub async fn health_check(&self) -> bool {
        self.cache.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory_store::MemoryStore;
    use crate::services::testing::{new_source, ScriptedFetcher};

    const PLAYLIST: &str = "#EXTM3U\n#EXTINF:-1 group-title=\"News\",CNN\nhttp://a/b\nhttp://c/d";

    async fn pipeline_with(fetcher: ScriptedFetcher) -> (AggregationPipeline, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store
            .create_source(new_source("Main", "http://main"))
            .await
            .unwrap();

        let pipeline = AggregationPipeline::new(
            store.clone(),
            store.clone(),
            Aggregator::new(Arc::new(fetcher)),
        );
        (pipeline, store)
    }

    #[tokio::test]
    async fn test_cache_miss_triggers_refresh() {
        let fetcher = ScriptedFetcher::new().respond("http://main", PLAYLIST);
        let (pipeline, store) = pipeline_with(fetcher.clone()).await;

        let snapshot = pipeline.snapshot(false).await.unwrap();

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(snapshot.total_channels(), 2);
        assert_eq!(store.load().await.unwrap(), Some(snapshot));
    }

    #[tokio::test]
    async fn test_valid_cache_skips_aggregation() {
        let fetcher = ScriptedFetcher::new().respond("http://main", PLAYLIST);
        let (pipeline, _store) = pipeline_with(fetcher.clone()).await;

        let first = pipeline.refresh().await.unwrap();
        let cached = pipeline.snapshot(false).await.unwrap();

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(cached, first);
    }

    #[tokio::test]
    async fn test_refresh_flag_always_aggregates() {
        let fetcher = ScriptedFetcher::new().respond("http://main", PLAYLIST);
        let (pipeline, _store) = pipeline_with(fetcher.clone()).await;

        pipeline.refresh().await.unwrap();
        let fresh = pipeline.snapshot(true).await.unwrap();

        assert_eq!(fetcher.calls(), 2);
        assert_eq!(fresh.total_channels(), 2);
    }

    #[tokio::test]
    async fn test_empty_result_is_not_served_from_cache() {
        let fetcher = ScriptedFetcher::new().fail("http://main");
        let (pipeline, _store) = pipeline_with(fetcher.clone()).await;

        let first = pipeline.snapshot(false).await.unwrap();
        assert_eq!(first.total_channels(), 0);
        assert_eq!(first.source_stats[0].channel_count, 0);

        pipeline.snapshot(false).await.unwrap();
        assert_eq!(fetcher.calls(), 2);
    }
}
