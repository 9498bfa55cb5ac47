//! Axum route handlers for the three answer-submission endpoints.

use axum::{extract::State, Json};

use crate::answers::collector::submit_batch;
use crate::errors::AppError;
use crate::models::answers::{SubmitCodingRequest, SubmitMcqRequest, SubmitTheoryRequest};
use crate::routes::MessageResponse;
use crate::state::AppState;

/// POST /submit_all_mcq_answers/
pub async fn handle_submit_mcq(
    State(state): State<AppState>,
    Json(request): Json<SubmitMcqRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    submit_batch(
        state.store.as_ref(),
        request.candidate_id,
        &request.submitted_mcqs,
    )
    .await?;
    Ok(Json(MessageResponse::new(
        "All MCQ answers submitted successfully!",
    )))
}

/// POST /submit_all_theory_answers/
pub async fn handle_submit_theory(
    State(state): State<AppState>,
    Json(request): Json<SubmitTheoryRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    submit_batch(
        state.store.as_ref(),
        request.candidate_id,
        &request.submitted_theory_questions,
    )
    .await?;
    Ok(Json(MessageResponse::new(
        "All theory answers submitted successfully!",
    )))
}

/// POST /submit_all_coding_answers/
pub async fn handle_submit_coding(
    State(state): State<AppState>,
    Json(request): Json<SubmitCodingRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    submit_batch(
        state.store.as_ref(),
        request.candidate_id,
        &request.submitted_coding_questions,
    )
    .await?;
    Ok(Json(MessageResponse::new(
        "All coding answers submitted successfully!",
    )))
}
