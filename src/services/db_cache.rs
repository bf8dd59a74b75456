//! PostgreSQL-backed snapshot cache and source registry
//!
//! `save` is delete-then-insert without a surrounding transaction.
//! Channel batches that fail are logged and skipped, so a stored
//! snapshot may hold fewer channels than were fetched.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::db::models::NewChannel;
use crate::db::repository::{channels, metadata, sources};
use crate::error::RegistryError;
use crate::models::{AggregationSnapshot, Channel, NewSource, Source};
use crate::services::store::{CacheStore, SourceRegistry};

/// PostgreSQL cache service for the aggregation snapshot
#[derive(Clone)]
pub struct DbCacheService {
    pool: PgPool,
    batch_size: usize,
}

impl DbCacheService {
    pub fn new(pool: PgPool, batch_size: usize) -> Self {
        Self {
            pool,
            batch_size: batch_size.max(1),
        }
    }

    /// Insert channels batch by batch, returning how many were stored
    async fn insert_channels(&self, all: &[Channel]) -> usize {
        let mut stored = 0;

        for (batch_index, rows) in plan_batches(all, self.batch_size).iter().enumerate() {
            match channels::insert_batch(&self.pool, rows).await {
                Ok(n) => stored += n as usize,
                Err(e) => tracing::error!("Error inserting batch {}: {}", batch_index, e),
            }
        }

        stored
    }
}

/// Split channels into insert batches, numbering `sort_order` across the
/// whole snapshot so reads keep fetch order however the batches land
fn plan_batches(all: &[Channel], batch_size: usize) -> Vec<Vec<NewChannel>> {
    let batch_size = batch_size.max(1);

    all.chunks(batch_size)
        .enumerate()
        .map(|(batch_index, batch)| {
            let offset = batch_index * batch_size;
            batch
                .iter()
                .enumerate()
                .map(|(i, channel)| NewChannel::from_channel(channel, (offset + i) as i32))
                .collect()
        })
        .collect()
}

#[async_trait]
impl CacheStore for DbCacheService {
    async fn save(&self, snapshot: &AggregationSnapshot) -> Result<()> {
        channels::delete_all(&self.pool)
            .await
            .context("Failed to clear cached channels")?;

        let stored = self.insert_channels(&snapshot.channels).await;
        if stored < snapshot.channels.len() {
            tracing::warn!(
                "Cached {} of {} channels",
                stored,
                snapshot.channels.len()
            );
        }

        if let Err(e) = metadata::delete_all(&self.pool).await {
            tracing::error!("Error clearing metadata: {}", e);
        }

        if let Err(e) = metadata::insert(
            &self.pool,
            snapshot.last_updated_at,
            snapshot.channels.len() as i32,
            &snapshot.source_stats,
        )
        .await
        {
            tracing::error!("Error inserting metadata: {}", e);
        }

        tracing::info!("Channels cached successfully");
        Ok(())
    }

    async fn load(&self) -> Result<Option<AggregationSnapshot>> {
        let meta = match metadata::find_latest(&self.pool)
            .await
            .context("Failed to read aggregation metadata")?
        {
            Some(m) => m,
            None => return Ok(None),
        };

        let rows = channels::get_all(&self.pool)
            .await
            .context("Failed to read cached channels")?;

        if rows.is_empty() {
            tracing::warn!("Metadata present but no cached channels, treating as miss");
            return Ok(None);
        }

        Ok(Some(AggregationSnapshot {
            channels: rows.into_iter().map(Into::into).collect(),
            source_stats: meta.source_stats.0,
            last_updated_at: meta.last_updated_at,
        }))
    }

    async fn health_check(&self) -> bool {
        db::health_check(&self.pool).await
    }
}

#[async_trait]
impl SourceRegistry for DbCacheService {
    async fn list_active_sources(&self) -> Result<Vec<Source>> {
        let rows = sources::list_active(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_sources(&self) -> Result<Vec<Source>> {
        let rows = sources::list_all(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_source(&self, source: NewSource) -> Result<Source, RegistryError> {
        let row = sources::insert(&self.pool, &source).await?;
        Ok(row.into())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Source, RegistryError> {
        sources::set_active(&self.pool, id, is_active)
            .await?
            .map(Into::into)
            .ok_or(RegistryError::NotFound(id))
    }

    async fn delete_source(&self, id: Uuid) -> Result<(), RegistryError> {
        match sources::delete(&self.pool, id).await? {
            0 => Err(RegistryError::NotFound(id)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels(count: usize) -> Vec<Channel> {
        (0..count)
            .map(|i| Channel {
                name: format!("Channel {}", i + 1),
                url: format!("http://stream/{}", i),
                group: None,
                logo: None,
                source: "Main".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_plan_batches_splits_and_numbers_contiguously() {
        let batches = plan_batches(&channels(1001), 500);

        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![500, 500, 1]);

        let orders: Vec<i32> = batches.iter().flatten().map(|row| row.sort_order).collect();
        assert_eq!(orders, (0..=1000).collect::<Vec<i32>>());
        assert_eq!(batches[2][0].url, "http://stream/1000");
    }

    #[test]
    fn test_plan_batches_exact_multiple() {
        let batches = plan_batches(&channels(1000), 500);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].last().map(|row| row.sort_order), Some(999));
    }

    #[test]
    fn test_plan_batches_empty() {
        assert!(plan_batches(&[], 500).is_empty());
    }

    #[test]
    fn test_plan_batches_zero_size_is_clamped() {
        let batches = plan_batches(&channels(3), 0);
        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|batch| batch.len() == 1));
    }
}
