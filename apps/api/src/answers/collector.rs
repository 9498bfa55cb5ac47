//! Persists answer batches. Only the shape is checked (by serde); answers are
//! never compared with the generated questions here.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::answers::{CodingAnswer, McqAnswer, TheoryAnswer};
use crate::session::artifact::ArtifactKind;
use crate::session::store::{write_json, SessionStore};

/// One of the three answer sections.
pub trait AnswerBatch: Serialize + Sync {
    const KIND: ArtifactKind;
    const SECTION: &'static str;
}

impl AnswerBatch for McqAnswer {
    const KIND: ArtifactKind = ArtifactKind::McqAnswers;
    const SECTION: &'static str = "MCQ";
}

impl AnswerBatch for TheoryAnswer {
    const KIND: ArtifactKind = ArtifactKind::TheoryAnswers;
    const SECTION: &'static str = "theory";
}

impl AnswerBatch for CodingAnswer {
    const KIND: ArtifactKind = ArtifactKind::CodingAnswers;
    const SECTION: &'static str = "coding";
}

/// Replaces the candidate's batch for section `A`. Unknown candidates are rejected
/// rather than created implicitly.
pub async fn submit_batch<A: AnswerBatch>(
    store: &dyn SessionStore,
    candidate_id: Uuid,
    answers: &[A],
) -> Result<(), AppError> {
    if !store.exists(candidate_id).await? {
        return Err(AppError::NotFound(format!(
            "Candidate {candidate_id} not found"
        )));
    }

    write_json(store, candidate_id, &A::KIND, answers).await?;
    info!(
        candidate_id = %candidate_id,
        section = A::SECTION,
        count = answers.len(),
        "Answer batch stored"
    );
    Ok(())
}
