//! In-process store used when no database is configured

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::RegistryError;
use crate::models::{AggregationSnapshot, Channel, NewSource, Source, SourceStat};
use crate::services::store::{CacheStore, SourceRegistry};

#[derive(Debug)]
struct CachedMetadata {
    last_updated_at: chrono::DateTime<Utc>,
    source_stats: Vec<SourceStat>,
}

/// Cache store and source registry backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    sources: RwLock<Vec<Source>>,
    channels: RwLock<Vec<Channel>>,
    metadata: RwLock<Option<CachedMetadata>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn save(&self, snapshot: &AggregationSnapshot) -> Result<()> {
        {
            let mut channels = self.channels.write().await;
            channels.clear();
            channels.extend(snapshot.channels.iter().cloned());
        }

        *self.metadata.write().await = Some(CachedMetadata {
            last_updated_at: snapshot.last_updated_at,
            source_stats: snapshot.source_stats.clone(),
        });

        tracing::info!("Cached {} channels in memory", snapshot.channels.len());
        Ok(())
    }

    async fn load(&self) -> Result<Option<AggregationSnapshot>> {
        let metadata = self.metadata.read().await;
        let Some(meta) = metadata.as_ref() else {
            return Ok(None);
        };

        let channels = self.channels.read().await;
        if channels.is_empty() {
            return Ok(None);
        }

        Ok(Some(AggregationSnapshot {
            channels: channels.clone(),
            source_stats: meta.source_stats.clone(),
            last_updated_at: meta.last_updated_at,
        }))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[async_trait]
impl SourceRegistry for MemoryStore {
    async fn list_active_sources(&self) -> Result<Vec<Source>> {
        Ok(self
            .sources
            .read()
            .await
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect())
    }

    async fn list_sources(&self) -> Result<Vec<Source>> {
        Ok(self.sources.read().await.clone())
    }

    async fn create_source(&self, source: NewSource) -> Result<Source, RegistryError> {
        let mut sources = self.sources.write().await;
        if sources.iter().any(|s| s.url == source.url) {
            return Err(RegistryError::AlreadyExists);
        }

        let created = Source {
            id: Uuid::new_v4(),
            name: source.name,
            url: source.url,
            description: source.description,
            is_active: true,
            created_at: Utc::now(),
        };
        sources.push(created.clone());

        Ok(created)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Source, RegistryError> {
        let mut sources = self.sources.write().await;
        let source = sources
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        source.is_active = is_active;
        Ok(source.clone())
    }

    async fn delete_source(&self, id: Uuid) -> Result<(), RegistryError> {
        let mut sources = self.sources.write().await;
        let before = sources.len();
        sources.retain(|s| s.id != id);

        if sources.len() == before {
            return Err(RegistryError::NotFound(id));
        }
        Ok(())
    }
}
