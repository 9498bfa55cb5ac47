//! Axum route handlers for session creation, audio upload and status polling.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobDescription;
use crate::routes::MessageResponse;
use crate::session::artifact::{ArtifactKind, AudioFormat};
use crate::session::status::{load_existing, save_status, SessionState, SessionStatus};
use crate::session::store::write_json;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub candidate_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AnswerPresence {
    pub mcq: bool,
    pub theory: bool,
    pub coding: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub candidate_id: Uuid,
    pub state: SessionState,
    pub failure: Option<String>,
    pub answers: AnswerPresence,
    pub final_report: bool,
    pub archive: Option<String>,
}

/// One uploaded multipart part.
struct UploadedPart {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /upload_resume
///
/// Multipart parts `resume` and `exam_details`. Creates the session and queues
/// exam generation in the background; the response does not wait for it.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut resume = None;
    let mut exam_details = None;

    while let Some((name, part)) = next_part(&mut multipart).await? {
        match name.as_str() {
            "resume" => resume = Some(part),
            "exam_details" => exam_details = Some(part),
            _ => {}
        }
    }

    let resume = resume.ok_or_else(|| AppError::Validation("resume file is required".into()))?;
    if resume.data.is_empty() {
        return Err(AppError::Validation("resume file is empty".into()));
    }
    let exam_details = exam_details
        .ok_or_else(|| AppError::Validation("exam_details file is required".into()))?;

    let job: JobDescription = serde_json::from_slice(&exam_details.data)
        .map_err(|e| AppError::Validation(format!("exam_details is not a valid record: {e}")))?;
    job.validate().map_err(AppError::Validation)?;

    // Admission happens before any write; a rejected upload leaves nothing on disk.
    let ticket = state.generation.reserve()?;

    let store = state.store.as_ref();
    let candidate_id = store.create_session().await?;
    store
        .put(candidate_id, &ArtifactKind::Resume, resume.data.to_vec())
        .await?;
    write_json(store, candidate_id, &ArtifactKind::JobDescription, &job).await?;
    save_status(
        store,
        candidate_id,
        &SessionStatus::new(SessionState::Created),
    )
    .await?;

    state.generation.spawn(candidate_id, ticket);
    info!(
        candidate_id = %candidate_id,
        difficulty = %job.test_details.difficulty_level,
        in_flight = state.generation.in_flight(),
        "Resume uploaded, generation queued"
    );

    Ok(Json(UploadResponse { candidate_id }))
}

/// POST /upload_audio/:candidate_id
pub async fn handle_upload_audio(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.store.exists(candidate_id).await? {
        return Err(AppError::NotFound(format!(
            "Candidate {candidate_id} not found"
        )));
    }

    let mut audio = None;
    while let Some((name, part)) = next_part(&mut multipart).await? {
        if name == "audio" {
            audio = Some(part);
        }
    }
    let audio = audio.ok_or_else(|| AppError::Validation("audio file is required".into()))?;
    let format = AudioFormat::detect(audio.file_name.as_deref(), audio.content_type.as_deref())
        .ok_or_else(|| AppError::Validation("unsupported audio format".into()))?;

    state
        .store
        .put(candidate_id, &ArtifactKind::Audio(format), audio.data.to_vec())
        .await?;
    info!(candidate_id = %candidate_id, format = format.extension(), "Audio stored");

    Ok(Json(MessageResponse::new("Audio uploaded successfully!")))
}

/// GET /session_status/:candidate_id
///
/// Polling endpoint: tells "still generating" apart from "generation failed".
pub async fn handle_session_status(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<SessionStatusResponse>, AppError> {
    let store = state.store.as_ref();
    let status = load_existing(store, candidate_id).await?;

    let answers = AnswerPresence {
        mcq: store.contains(candidate_id, &ArtifactKind::McqAnswers).await?,
        theory: store.contains(candidate_id, &ArtifactKind::TheoryAnswers).await?,
        coding: store.contains(candidate_id, &ArtifactKind::CodingAnswers).await?,
    };
    let final_report = store.contains(candidate_id, &ArtifactKind::FinalReport).await?;

    Ok(Json(SessionStatusResponse {
        candidate_id,
        state: status.state,
        failure: status.failure,
        answers,
        final_report,
        archive: status.archive,
    }))
}

async fn next_part(multipart: &mut Multipart) -> Result<Option<(String, UploadedPart)>, AppError> {
    let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    else {
        return Ok(None);
    };

    let name = field.name().unwrap_or_default().to_string();
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read part '{name}': {e}")))?;

    Ok(Some((
        name,
        UploadedPart {
            file_name,
            content_type,
            data,
        },
    )))
}
