//! Pool, migrations and liveness for the channel cache database

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{error, info};

/// `host:port/dbname` of a connection URL with credentials stripped, for logs
pub fn redact_database_url(database_url: &str) -> String {
    let parsed = match url::Url::parse(database_url) {
        Ok(parsed) => parsed,
        Err(_) => return "<unparseable database url>".to_string(),
    };

    match parsed.host_str() {
        Some(host) => {
            let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();
            format!("{}{}{}", host, port, parsed.path())
        }
        None => "<database url without host>".to_string(),
    }
}

/// Connect to the cache database; the URL comes from `DATABASE_URL`
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let target = redact_database_url(database_url);
    info!("Connecting to PostgreSQL at {}...", target);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to PostgreSQL at {}", target))?;

    info!("Channel cache pool ready ({} max connections)", max_connections.max(1));

    Ok(pool)
}

/// Create the sources, channels and metadata tables if missing
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run cache migrations")?;

    info!("Cache schema up to date");
    Ok(())
}

/// Backs the store half of /health and /ready
pub async fn health_check(pool: &PgPool) -> bool {
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => true,
        Err(e) => {
            error!("Cache database health check failed: {}", e);
            false
        }
    }
}
