//! Axum route handlers serving the generated question sets.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::exam::{CodingQuestion, Exam, Mcq, TheoryQuestion};
use crate::session::artifact::ArtifactKind;
use crate::session::status::load_existing;
use crate::session::store::{read_json, StoreError};
use crate::state::AppState;

/// GET /get_mcq/:candidate_id
///
/// 202 while generation runs, 422 if it failed, 404 for unknown candidates.
pub async fn handle_get_mcq(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<Vec<Mcq>>, AppError> {
    let exam = load_ready_exam(&state, candidate_id).await?;
    Ok(Json(exam.mcq_questions))
}

/// GET /get_theory_question/:candidate_id
pub async fn handle_get_theory(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<Vec<TheoryQuestion>>, AppError> {
    let exam = load_ready_exam(&state, candidate_id).await?;
    Ok(Json(exam.theory_questions))
}

/// GET /get_coding_question/:candidate_id
pub async fn handle_get_coding(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<Vec<CodingQuestion>>, AppError> {
    let exam = load_ready_exam(&state, candidate_id).await?;
    Ok(Json(exam.coding_questions))
}

async fn load_ready_exam(state: &AppState, candidate_id: Uuid) -> Result<Exam, AppError> {
    let store = state.store.as_ref();
    load_existing(store, candidate_id)
        .await?
        .require_exam(candidate_id)?;

    match read_json::<Exam>(store, candidate_id, &ArtifactKind::Exam).await {
        Ok(exam) => Ok(exam),
        Err(StoreError::NotFound { .. }) | Err(StoreError::Serde(_)) => Err(AppError::NotFound(
            "Questions not found or improperly generated.".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}
