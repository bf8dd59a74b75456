//! Error types at the registry and HTTP seams

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

/// Errors from the source registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("a source with this URL already exists")]
    AlreadyExists,

    #[error("source {0} not found")]
    NotFound(Uuid),

    #[error("invalid source: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<sqlx::Error> for RegistryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            // unique_violation on m3u_sources.url
            if db.code().as_deref() == Some("23505") {
                return RegistryError::AlreadyExists;
            }
        }
        RegistryError::Storage(err.into())
    }
}

/// Errors surfaced by HTTP handlers, rendered as `{success:false, error}`
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("server configuration error: {0}")]
    Configuration(String),

    /// Malformed request that never reached the handler body
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Registry(RegistryError::AlreadyExists) => StatusCode::CONFLICT,
            AppError::Registry(RegistryError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Registry(RegistryError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            AppError::Rejected { status, .. } => *status,
            AppError::Registry(RegistryError::Storage(_))
            | AppError::Configuration(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message, including the context chain of internal errors
    pub fn message(&self) -> String {
        match self {
            AppError::Internal(e) | AppError::Registry(RegistryError::Storage(e)) => {
                format!("{:#}", e)
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", message);
        }

        (
            status,
            Json(serde_json::json!({ "success": false, "error": message })),
        )
            .into_response()
    }
}
