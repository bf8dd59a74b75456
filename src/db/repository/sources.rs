//! Source registry repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::SourceRow;
use crate::models::NewSource;

/// List active sources, oldest first
pub async fn list_active(pool: &PgPool) -> Result<Vec<SourceRow>, sqlx::Error> {
    sqlx::query_as::<_, SourceRow>(
        r#"
        SELECT id, name, url, description, is_active, created_at
        FROM m3u_sources
        WHERE is_active = TRUE
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// List all sources, oldest first
pub async fn list_all(pool: &PgPool) -> Result<Vec<SourceRow>, sqlx::Error> {
    sqlx::query_as::<_, SourceRow>(
        r#"
        SELECT id, name, url, description, is_active, created_at
        FROM m3u_sources
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Insert a source; a duplicate URL fails with unique violation 23505
pub async fn insert(pool: &PgPool, source: &NewSource) -> Result<SourceRow, sqlx::Error> {
    sqlx::query_as::<_, SourceRow>(
        r#"
        INSERT INTO m3u_sources (name, url, description)
        VALUES ($1, $2, $3)
        RETURNING id, name, url, description, is_active, created_at
        "#,
    )
    .bind(&source.name)
    .bind(&source.url)
    .bind(&source.description)
    .fetch_one(pool)
    .await
}

/// Toggle whether a source participates in aggregation
pub async fn set_active(
    pool: &PgPool,
    id: Uuid,
    is_active: bool,
) -> Result<Option<SourceRow>, sqlx::Error> {
    sqlx::query_as::<_, SourceRow>(
        r#"
        UPDATE m3u_sources SET is_active = $2
        WHERE id = $1
        RETURNING id, name, url, description, is_active, created_at
        "#,
    )
    .bind(id)
    .bind(is_active)
    .fetch_optional(pool)
    .await
}

/// Delete a source
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM m3u_sources WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
