use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m3u_aggregator::config::Config;
use m3u_aggregator::db::{create_pool, run_migrations};
use m3u_aggregator::services::{
    aggregator::Aggregator,
    db_cache::DbCacheService,
    fetcher::HttpFetcher,
    memory_store::MemoryStore,
    pipeline::AggregationPipeline,
    refresher::start_refresh_task,
    store::{CacheStore, SourceRegistry},
};
use m3u_aggregator::{build_router, AppState};

type Stores = (Arc<dyn SourceRegistry>, Arc<dyn CacheStore>);

/// Postgres when configured, otherwise an in-memory store
async fn connect_stores(config: &Config) -> anyhow::Result<Stores> {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.db_max_connections).await?;
            tracing::info!("PostgreSQL connected");

            run_migrations(&pool).await?;

            let db = Arc::new(DbCacheService::new(pool, config.insert_batch_size));
            let registry: Arc<dyn SourceRegistry> = db.clone();
            let cache: Arc<dyn CacheStore> = db;
            Ok((registry, cache))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            let memory = Arc::new(MemoryStore::new());
            let registry: Arc<dyn SourceRegistry> = memory.clone();
            let cache: Arc<dyn CacheStore> = memory;
            Ok((registry, cache))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "m3u_aggregator=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting M3U Aggregator v{}", env!("CARGO_PKG_VERSION"));

    let (registry, cache) = connect_stores(&config).await?;

    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let pipeline = Arc::new(AggregationPipeline::new(
        registry.clone(),
        cache,
        Aggregator::new(Arc::new(fetcher)),
    ));

    // Start periodic refresh (runs in background)
    if let Some(interval_secs) = config.refresh_interval_secs {
        tokio::spawn(start_refresh_task(pipeline.clone(), interval_secs));
    }

    // Build application state
    let state = Arc::new(AppState {
        config,
        registry,
        pipeline,
        start_time: Instant::now(),
    });

    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
