use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Single channel produced by parsing a source playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Name of the source this channel came from
    pub source: String,
}

/// Configured playlist source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-source channel count in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStat {
    pub name: String,
    pub url: String,
    pub channel_count: usize,
}

/// One complete refresh outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationSnapshot {
    pub channels: Vec<Channel>,
    pub source_stats: Vec<SourceStat>,
    pub last_updated_at: DateTime<Utc>,
}

impl AggregationSnapshot {
    pub fn total_channels(&self) -> usize {
        self.channels.len()
    }
}

/// Validated input for registering a source
#[derive(Debug, Clone)]
pub struct NewSource {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
}
