//! Background generation: job description + resume -> profile + exam artifacts.
//!
//! Flow: load job description → extract profile → generate exam → attach profile →
//! persist profile and exam → mark the session ExamReady.
//! Errors are returned to the queue, which records them as GenerationFailed.

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::skills::extract_profile;
use crate::generation::exam_generator::generate_exam;
use crate::llm_client::LanguageModel;
use crate::models::exam::Exam;
use crate::models::job::JobDescription;
use crate::session::artifact::ArtifactKind;
use crate::session::status::{save_status, SessionState, SessionStatus};
use crate::session::store::{read_json, write_json, SessionStore};

pub async fn run_generation(
    store: &dyn SessionStore,
    llm: &dyn LanguageModel,
    candidate_id: Uuid,
) -> Result<Exam, AppError> {
    // Exam artifacts are write-once.
    if store.contains(candidate_id, &ArtifactKind::Exam).await? {
        return Err(AppError::Validation(format!(
            "Exam for candidate {candidate_id} already exists"
        )));
    }

    save_status(
        store,
        candidate_id,
        &SessionStatus::new(SessionState::Generating),
    )
    .await?;
    info!(candidate_id = %candidate_id, "Exam generation started");

    let job: JobDescription = read_json(store, candidate_id, &ArtifactKind::JobDescription).await?;
    let resume = store.get(candidate_id, &ArtifactKind::Resume).await?;

    let profile = extract_profile(llm, resume, &job.requirements).await?;
    info!(
        candidate_id = %candidate_id,
        mandatory = profile.exam_skills.mandatory_skills.len(),
        important = profile.exam_skills.important_skills.len(),
        "Profile extracted"
    );

    let mut exam = generate_exam(llm, &profile.exam_skills, &job.test_details).await?;
    exam.profile = Some(profile.clone());

    write_json(store, candidate_id, &ArtifactKind::Profile, &profile).await?;
    write_json(store, candidate_id, &ArtifactKind::Exam, &exam).await?;
    save_status(
        store,
        candidate_id,
        &SessionStatus::new(SessionState::ExamReady),
    )
    .await?;

    info!(candidate_id = %candidate_id, "Exam ready");
    Ok(exam)
}
