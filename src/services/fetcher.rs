//! Source playlist fetching
//!
//! A single best-effort GET per source. Any failure is logged and
//! degrades to zero channels so the remaining sources still aggregate.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::models::Channel;
use crate::services::m3u_parser::parse_m3u;
use crate::services::metrics::SOURCE_FETCH_FAILURES;

/// Retrieves and parses the playlist of one source
#[async_trait]
pub trait PlaylistFetcher: Send + Sync {
    /// Never fails; an unreachable or broken source yields no channels
    async fn fetch(&self, name: &str, url: &str) -> Vec<Channel>;
}

/// HTTP fetcher with a fixed identification header
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    async fn fetch_text(&self, url: &str) -> Result<Option<String>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Failed to fetch {}: HTTP {}", url, status.as_u16());
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl PlaylistFetcher for HttpFetcher {
    async fn fetch(&self, name: &str, url: &str) -> Vec<Channel> {
        tracing::info!("Fetching M3U from: {}", url);

        match self.fetch_text(url).await {
            Ok(Some(content)) => parse_m3u(&content, name),
            Ok(None) => {
                SOURCE_FETCH_FAILURES.inc();
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Error fetching {}: {:#}", url, e);
                SOURCE_FETCH_FAILURES.inc();
                Vec::new()
            }
        }
    }
}
