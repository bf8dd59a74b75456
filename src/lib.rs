pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::services::pipeline::AggregationPipeline;
use crate::services::store::SourceRegistry;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub registry: Arc<dyn SourceRegistry>,
    pub pipeline: Arc<AggregationPipeline>,
    pub start_time: Instant,
}

/// Build the HTTP router with middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoints
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/ready", get(routes::health::ready))
        .route("/live", get(routes::health::live))
        // Aggregated playlist
        .route("/api/aggregate", get(routes::aggregate::aggregate))
        // Source registry
        .route(
            "/api/sources",
            get(routes::sources::list_sources).post(routes::sources::create_source),
        )
        .route(
            "/api/sources/verify-password",
            post(routes::sources::verify_password),
        )
        .route(
            "/api/sources/:id",
            patch(routes::sources::update_source).delete(routes::sources::delete_source),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
