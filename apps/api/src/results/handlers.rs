//! Axum route handlers for finalize, archive download and report retrieval.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::results::finalize::finalize_result;
use crate::session::artifact::ArtifactKind;
use crate::session::status::load_existing;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CandidateQuery {
    pub candidate_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct FinalResultResponse {
    pub message: &'static str,
    pub zip_path: String,
    pub candidate_name: String,
}

#[derive(Debug, Serialize)]
pub struct FinalReportResponse {
    pub candidate_id: Uuid,
    pub final_report: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate_final_result/?candidate_id=…
pub async fn handle_generate_final_result(
    State(state): State<AppState>,
    Query(query): Query<CandidateQuery>,
) -> Result<Json<FinalResultResponse>, AppError> {
    let candidate_id = query.candidate_id;
    let outcome = finalize_result(state.store.as_ref(), state.llm.as_ref(), candidate_id).await?;
    info!(
        candidate_id = %candidate_id,
        archive = %outcome.archive,
        "Final result ready: {}/{}",
        outcome.marks.obtained,
        outcome.marks.total
    );

    Ok(Json(FinalResultResponse {
        message: "Final result ZIP generated successfully!",
        zip_path: outcome.archive_location,
        candidate_name: outcome.candidate_name,
    }))
}

/// GET /download_zip/?candidate_id=…
///
/// Serves the archive recorded by the last successful finalize.
pub async fn handle_download_zip(
    State(state): State<AppState>,
    Query(query): Query<CandidateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store.as_ref();
    let candidate_id = query.candidate_id;
    let status = load_existing(store, candidate_id).await?;

    let not_generated = || AppError::NotFound("ZIP file not found. Please generate it first.".into());
    let (Some(stem), Some(file_name)) = (status.candidate_name, status.archive) else {
        return Err(not_generated());
    };

    let bytes = match store.get(candidate_id, &ArtifactKind::Archive(stem)).await {
        Ok(bytes) => bytes,
        Err(e) if e.is_not_found() => return Err(not_generated()),
        Err(e) => return Err(e.into()),
    };
    info!(candidate_id = %candidate_id, size = bytes.len(), "Serving archive {file_name}");

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}

/// GET /get_final_report/?candidate_id=…
pub async fn handle_get_final_report(
    State(state): State<AppState>,
    Query(query): Query<CandidateQuery>,
) -> Result<Json<FinalReportResponse>, AppError> {
    let store = state.store.as_ref();
    let candidate_id = query.candidate_id;

    let bytes = match store.get(candidate_id, &ArtifactKind::FinalReport).await {
        Ok(bytes) => bytes,
        Err(e) if e.is_not_found() => {
            return Err(AppError::NotFound(
                "Final report not found. Please generate it first.".into(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(FinalReportResponse {
        candidate_id,
        final_report: String::from_utf8_lossy(&bytes).into_owned(),
    }))
}
