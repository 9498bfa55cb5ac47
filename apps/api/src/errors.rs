use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::session::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Earlier pipeline stage still running. Clients poll again.
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Background generation ended in a terminal failure. Polling will not help.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Service busy: {0}")]
    Busy(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownSession(id) => {
                AppError::NotFound(format!("Candidate {id} not found"))
            }
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::Io(_) | StoreError::Serde(_) | StoreError::Blocking(_) => {
                AppError::Storage(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotReady(msg) => (StatusCode::ACCEPTED, "NOT_READY", msg.clone()),
            AppError::GenerationFailed(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "GENERATION_FAILED",
                msg.clone(),
            ),
            AppError::Busy(msg) => (StatusCode::SERVICE_UNAVAILABLE, "BUSY", msg.clone()),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
