//! Regenerate the static aggregated playlist file from the source registry

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

use m3u_aggregator::config::Config;
use m3u_aggregator::db::create_pool;
use m3u_aggregator::services::{
    aggregator::Aggregator, db_cache::DbCacheService, fetcher::HttpFetcher,
    static_playlist::write_static_playlist,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "m3u_aggregator=info".into()),
        )
        .init();

    let config = Config::from_env();
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to read the source registry")?;

    let pool = create_pool(database_url, config.db_max_connections).await?;
    let registry = DbCacheService::new(pool, config.insert_batch_size);
    let aggregator = Aggregator::new(Arc::new(HttpFetcher::new(&config.user_agent)?));

    let output = Path::new(&config.snapshot_output_path);
    match write_static_playlist(&registry, &aggregator, output).await {
        Ok(count) => {
            tracing::info!("Wrote {} channels to {}", count, output.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to generate M3U file: {:#}", e);
            Err(e)
        }
    }
}
