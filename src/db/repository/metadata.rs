//! Aggregation metadata repository

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::MetadataRow;
use crate::models::SourceStat;

/// Delete every metadata record
pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM aggregation_metadata")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Insert a metadata record
pub async fn insert(
    pool: &PgPool,
    last_updated_at: DateTime<Utc>,
    total_channels: i32,
    source_stats: &[SourceStat],
) -> Result<Uuid, sqlx::Error> {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO aggregation_metadata (last_updated_at, total_channels, source_stats)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(last_updated_at)
    .bind(total_channels)
    .bind(Json(source_stats))
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// Most recent metadata record
pub async fn find_latest(pool: &PgPool) -> Result<Option<MetadataRow>, sqlx::Error> {
    sqlx::query_as::<_, MetadataRow>(
        r#"
        SELECT id, last_updated_at, total_channels, source_stats
        FROM aggregation_metadata
        ORDER BY last_updated_at DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await
}
