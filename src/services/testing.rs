//! Test doubles and router builders shared by the unit tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::Config;
use crate::error::RegistryError;
use crate::models::{AggregationSnapshot, Channel, NewSource, Source};
use crate::services::aggregator::Aggregator;
use crate::services::fetcher::PlaylistFetcher;
use crate::services::m3u_parser::parse_m3u;
use crate::services::memory_store::MemoryStore;
use crate::services::pipeline::AggregationPipeline;
use crate::services::store::{CacheStore, SourceRegistry};
use crate::{build_router, AppState};

pub fn source(name: &str, url: &str) -> Source {
    Source {
        id: Uuid::new_v4(),
        name: name.to_string(),
        url: url.to_string(),
        description: None,
        is_active: true,
        created_at: Utc::now(),
    }
}

pub fn new_source(name: &str, url: &str) -> NewSource {
    NewSource {
        name: name.to_string(),
        url: url.to_string(),
        description: None,
    }
}

#[derive(Clone)]
struct Script {
    content: Option<String>,
    delay_ms: u64,
}

/// Fetcher answering from canned playlists; unknown URLs fail
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    scripts: HashMap<String, Script>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, url: &str, content: Option<&str>, delay_ms: u64) -> Self {
        self.scripts.insert(
            url.to_string(),
            Script {
                content: content.map(String::from),
                delay_ms,
            },
        );
        self
    }

    pub fn respond(self, url: &str, content: &str) -> Self {
        self.with(url, Some(content), 0)
    }

    pub fn respond_after(self, url: &str, content: &str, delay_ms: u64) -> Self {
        self.with(url, Some(content), delay_ms)
    }

    pub fn fail(self, url: &str) -> Self {
        self.with(url, None, 0)
    }

    /// Number of fetches performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlaylistFetcher for ScriptedFetcher {
    async fn fetch(&self, name: &str, url: &str) -> Vec<Channel> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let Some(script) = self.scripts.get(url) else {
            return Vec::new();
        };
        if script.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(script.delay_ms)).await;
        }

        script
            .content
            .as_deref()
            .map(|content| parse_m3u(content, name))
            .unwrap_or_default()
    }
}

/// Router over `store` with the given fetcher and config
pub fn router_with<S>(store: Arc<S>, fetcher: ScriptedFetcher, config: Config) -> Router
where
    S: CacheStore + SourceRegistry + 'static,
{
    let pipeline = AggregationPipeline::new(
        store.clone(),
        store.clone(),
        Aggregator::new(Arc::new(fetcher)),
    );

    build_router(Arc::new(AppState {
        config,
        registry: store,
        pipeline: Arc::new(pipeline),
        start_time: Instant::now(),
    }))
}

/// Router over a fresh in-memory store seeded with `sources`
pub async fn app(fetcher: ScriptedFetcher, sources: &[(&str, &str)]) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    for (name, url) in sources {
        store.create_source(new_source(name, url)).await.unwrap();
    }

    (router_with(store.clone(), fetcher, Config::default()), store)
}

/// Store whose backend is never reachable
pub struct UnreachableStore;

fn unreachable() -> anyhow::Error {
    anyhow!("connection refused")
}

#[async_trait]
impl CacheStore for UnreachableStore {
    async fn save(&self, _snapshot: &AggregationSnapshot) -> Result<()> {
        Err(unreachable())
    }

    async fn load(&self) -> Result<Option<AggregationSnapshot>> {
        Err(unreachable())
    }

    async fn health_check(&self) -> bool {
        false
    }
}

#[async_trait]
impl SourceRegistry for UnreachableStore {
    async fn list_active_sources(&self) -> Result<Vec<Source>> {
        Err(unreachable())
    }

    async fn list_sources(&self) -> Result<Vec<Source>> {
        Err(unreachable())
    }

    async fn create_source(&self, _source: NewSource) -> Result<Source, RegistryError> {
        Err(RegistryError::Storage(unreachable()))
    }

    async fn set_active(&self, _id: Uuid, _is_active: bool) -> Result<Source, RegistryError> {
        Err(RegistryError::Storage(unreachable()))
    }

    async fn delete_source(&self, _id: Uuid) -> Result<(), RegistryError> {
        Err(RegistryError::Storage(unreachable()))
    }
}
