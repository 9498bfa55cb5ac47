//! Explicit session lifecycle, persisted as `status.json` next to the artifacts.
//!
//! Created → Generating → ExamReady → Finalized, with GenerationFailed as the
//! terminal state of a broken background task. Answer submissions do not move
//! the state; which batches exist is read from the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::artifact::ArtifactKind;
use crate::session::store::{read_json, write_json, SessionStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Created,
    Generating,
    ExamReady,
    GenerationFailed,
    Finalized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub state: SessionState,
    /// Captured cause when `state` is `GenerationFailed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    /// File name of the last archive built by finalize.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SessionStatus {
    pub fn new(state: SessionState) -> Self {
        Self {
            state,
            failure: None,
            candidate_name: None,
            archive: None,
            updated_at: Utc::now(),
        }
    }

    pub fn failed(cause: impl Into<String>) -> Self {
        Self {
            failure: Some(cause.into()),
            ..Self::new(SessionState::GenerationFailed)
        }
    }

    pub fn finalized(candidate_name: String, archive: String) -> Self {
        Self {
            candidate_name: Some(candidate_name),
            archive: Some(archive),
            ..Self::new(SessionState::Finalized)
        }
    }

    /// Exam content is readable once generation has completed.
    pub fn exam_available(&self) -> bool {
        matches!(self.state, SessionState::ExamReady | SessionState::Finalized)
    }

    /// Gate for every operation that needs the generated exam.
    /// Distinguishes "poll again" from "this session will never get an exam".
    pub fn require_exam(&self, id: Uuid) -> Result<(), AppError> {
        if self.exam_available() {
            return Ok(());
        }
        match self.state {
            SessionState::GenerationFailed => Err(AppError::GenerationFailed(
                self.failure
                    .clone()
                    .unwrap_or_else(|| "exam generation failed".to_string()),
            )),
            _ => Err(AppError::NotReady(format!(
                "Test generation in progress for candidate {id}. Please retry."
            ))),
        }
    }
}

pub async fn load_status(store: &dyn SessionStore, id: Uuid) -> Result<SessionStatus, StoreError> {
    read_json(store, id, &ArtifactKind::Status).await
}

pub async fn save_status(
    store: &dyn SessionStore,
    id: Uuid,
    status: &SessionStatus,
) -> Result<(), StoreError> {
    write_json(store, id, &ArtifactKind::Status, status).await
}

/// Loads the status of a session the caller names, mapping every "missing" case to 404.
pub async fn load_existing(store: &dyn SessionStore, id: Uuid) -> Result<SessionStatus, AppError> {
    match load_status(store, id).await {
        Ok(status) => Ok(status),
        Err(StoreError::UnknownSession(_)) | Err(StoreError::NotFound { .. }) => {
            Err(AppError::NotFound(format!("Candidate {id} not found")))
        }
        Err(e) => Err(e.into()),
    }
}
