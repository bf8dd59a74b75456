//! Aggregated channels repository

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::{ChannelRow, NewChannel};

/// Delete every cached channel
pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM aggregated_channels")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Insert one batch of channels in a single statement
pub async fn insert_batch(pool: &PgPool, channels: &[NewChannel]) -> Result<u64, sqlx::Error> {
    if channels.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO aggregated_channels (name, url, group_title, logo, source_name, sort_order) ",
    );
    builder.push_values(channels, |mut row, channel| {
        row.push_bind(&channel.name)
            .push_bind(&channel.url)
            .push_bind(&channel.group_title)
            .push_bind(&channel.logo)
            .push_bind(&channel.source_name)
            .push_bind(channel.sort_order);
    });

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}

/// Get all cached channels in insertion order
pub async fn get_all(pool: &PgPool) -> Result<Vec<ChannelRow>, sqlx::Error> {
    sqlx::query_as::<_, ChannelRow>(
        r#"
        SELECT id, name, url, group_title, logo, source_name, sort_order
        FROM aggregated_channels
        ORDER BY sort_order, created_at
        "#,
    )
    .fetch_all(pool)
    .await
}
