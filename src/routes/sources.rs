//! Source registry endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, RegistryError};
use crate::models::{
    CreateSourceRequest, NewSource, Source, UpdateSourceRequest, VerifyPasswordRequest,
    VerifyPasswordResponse,
};
use crate::AppState;

/// Trim inputs and require an absolute URL
fn validate_new_source(payload: CreateSourceRequest) -> Result<NewSource, RegistryError> {
    let name = payload.name.trim().to_string();
    let url = payload.url.trim().to_string();

    if name.is_empty() || url.is_empty() {
        return Err(RegistryError::InvalidInput(
            "name and url are required".to_string(),
        ));
    }

    url::Url::parse(&url)
        .map_err(|e| RegistryError::InvalidInput(format!("invalid URL: {}", e)))?;

    let description = payload
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Ok(NewSource {
        name,
        url,
        description,
    })
}

/// GET /api/sources - All sources, oldest first
pub async fn list_sources(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Source>>, AppError> {
    let sources = state.registry.list_sources().await?;
    Ok(Json(sources))
}

/// POST /api/sources - Register a source
pub async fn create_source(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSourceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let new_source = validate_new_source(payload)?;
    let source = state.registry.create_source(new_source).await?;

    tracing::info!("Source added: {} ({})", source.name, source.url);
    Ok((StatusCode::CREATED, Json(source)))
}

/// PATCH /api/sources/:id - Toggle participation in aggregation
pub async fn update_source(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateSourceRequest>, JsonRejection>,
) -> Result<Json<Source>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let source = state.registry.set_active(id, payload.is_active).await?;
    Ok(Json(source))
}

/// DELETE /api/sources/:id
pub async fn delete_source(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    state.registry.delete_source(id).await?;

    tracing::info!("Source deleted: {}", id);
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/sources/verify-password - Check the source manager password
pub async fn verify_password(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerifyPasswordRequest>, JsonRejection>,
) -> Result<Json<VerifyPasswordResponse>, AppError> {
    let Json(payload) = payload?;
    let expected = state
        .config
        .source_manager_password
        .as_deref()
        .ok_or_else(|| AppError::Configuration("SOURCE_MANAGER_PASSWORD not configured".to_string()))?;

    Ok(Json(VerifyPasswordResponse {
        success: true,
        valid: payload.password == expected,
    }))
}
