use axum::{
    extract::{RawQuery, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::SecondsFormat;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{AggregateQuery, AggregateResponse, AggregationSnapshot, OutputFormat};
use crate::services::m3u_parser::render_m3u;
use crate::AppState;

const M3U_CONTENT_TYPE: &str = "audio/x-mpegurl";
const M3U_DISPOSITION: &str = "attachment; filename=\"aggregated.m3u\"";

fn json_envelope(snapshot: AggregationSnapshot) -> AggregateResponse {
    AggregateResponse {
        success: true,
        total_channels: snapshot.total_channels(),
        last_updated: Some(
            snapshot
                .last_updated_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        sources: snapshot.source_stats,
        channels: snapshot.channels,
    }
}

/// GET /api/aggregate?format=json|m3u&refresh=true|false
///
/// Serves the cached snapshot unless `refresh=true` or the cache is
/// missing, in which case all active sources are aggregated again.
pub async fn aggregate(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Response, AppError> {
    let query = AggregateQuery::from_query_string(raw.as_deref());
    let snapshot = state.pipeline.snapshot(query.wants_refresh()).await?;

    let response = match query.output_format() {
        OutputFormat::M3u => (
            [
                (header::CONTENT_TYPE, M3U_CONTENT_TYPE),
                (header::CONTENT_DISPOSITION, M3U_DISPOSITION),
            ],
            render_m3u(&snapshot.channels),
        )
            .into_response(),
        OutputFormat::Json => Json(json_envelope(snapshot)).into_response(),
    };

    Ok(response)
}
