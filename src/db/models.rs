//! Database row types for PostgreSQL
//!
//! These types map directly to database rows and convert into the
//! domain types in models/channel.rs

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{Channel, Source, SourceStat};

// ============================================================================
// Database Row Types
// ============================================================================

/// Source row from database
#[derive(Debug, Clone, FromRow)]
pub struct SourceRow {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SourceRow> for Source {
    fn from(row: SourceRow) -> Self {
        Source {
            id: row.id,
            name: row.name,
            url: row.url,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Aggregated channel row from database
#[derive(Debug, Clone, FromRow)]
pub struct ChannelRow {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub group_title: Option<String>,
    pub logo: Option<String>,
    pub source_name: String,
    pub sort_order: i32,
}

impl From<ChannelRow> for Channel {
    fn from(row: ChannelRow) -> Self {
        Channel {
            name: row.name,
            url: row.url,
            group: row.group_title,
            logo: row.logo,
            source: row.source_name,
        }
    }
}

/// Aggregation metadata row from database
#[derive(Debug, Clone, FromRow)]
pub struct MetadataRow {
    pub id: Uuid,
    pub last_updated_at: DateTime<Utc>,
    pub total_channels: i32,
    pub source_stats: Json<Vec<SourceStat>>,
}

// ============================================================================
// Insert Types
// ============================================================================

/// New channel for insertion
#[derive(Debug, Clone)]
pub struct NewChannel {
    pub name: String,
    pub url: String,
    pub group_title: Option<String>,
    pub logo: Option<String>,
    pub source_name: String,
    pub sort_order: i32,
}

impl NewChannel {
    /// Empty group/logo are stored as NULL
    pub fn from_channel(channel: &Channel, sort_order: i32) -> Self {
        NewChannel {
            name: channel.name.clone(),
            url: channel.url.clone(),
            group_title: channel.group.clone().filter(|g| !g.is_empty()),
            logo: channel.logo.clone().filter(|l| !l.is_empty()),
            source_name: channel.source.clone(),
            sort_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_channel_drops_empty_attributes() {
        let channel = Channel {
            name: "A".to_string(),
            url: "http://a".to_string(),
            group: Some(String::new()),
            logo: Some("http://logo".to_string()),
            source: "S".to_string(),
        };

        let row = NewChannel::from_channel(&channel, 7);
        assert!(row.group_title.is_none());
        assert_eq!(row.logo.as_deref(), Some("http://logo"));
        assert_eq!(row.sort_order, 7);
    }

    #[test]
    fn test_channel_row_into_channel() {
        let row = ChannelRow {
            id: Uuid::new_v4(),
            name: "A".to_string(),
            url: "http://a".to_string(),
            group_title: Some("News".to_string()),
            logo: None,
            source_name: "S".to_string(),
            sort_order: 0,
        };

        let channel: Channel = row.into();
        assert_eq!(channel.group.as_deref(), Some("News"));
        assert_eq!(channel.source, "S");
    }
}
