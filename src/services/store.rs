//! Persistence seams: the snapshot cache and the source registry

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RegistryError;
use crate::models::{AggregationSnapshot, NewSource, Source};

/// Holds the single current aggregation snapshot
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Replace the cached channels and metadata with `snapshot`.
    /// Not transactional: concurrent saves may interleave.
    async fn save(&self, snapshot: &AggregationSnapshot) -> Result<()>;

    /// Most recent snapshot, or `None` when there is no metadata or
    /// the channel collection is empty
    async fn load(&self) -> Result<Option<AggregationSnapshot>>;

    async fn health_check(&self) -> bool;
}

/// Configured playlist sources, in creation order
#[async_trait]
pub trait SourceRegistry: Send + Sync {
    async fn list_active_sources(&self) -> Result<Vec<Source>>;

    async fn list_sources(&self) -> Result<Vec<Source>>;

    async fn create_source(&self, source: NewSource) -> Result<Source, RegistryError>;

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Source, RegistryError>;

    async fn delete_source(&self, id: Uuid) -> Result<(), RegistryError>;
}
