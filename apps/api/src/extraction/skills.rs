//! Skills profile extraction: resume + job requirements -> `SkillsProfile` via the model.

use tracing::info;

use crate::errors::AppError;
use crate::extraction::prompts::{PROFILE_PERSONA, PROFILE_PROMPT_TEMPLATE};
use crate::extraction::resume_text::extract_resume_text;
use crate::llm_client::prompts::{fill, json_system};
use crate::llm_client::{complete_json, LanguageModel};
use crate::models::profile::SkillsProfile;

/// Extracts the candidate profile. Text extraction degrades gracefully; a model
/// failure is returned to the caller untouched.
pub async fn extract_profile(
    llm: &dyn LanguageModel,
    resume: Vec<u8>,
    job_requirements: &str,
) -> Result<SkillsProfile, AppError> {
    let resume_text = extract_resume_text(resume).await;
    info!("Resume text extracted ({} chars)", resume_text.len());

    // Resume text goes last so its content is never treated as a placeholder.
    let prompt = fill(
        PROFILE_PROMPT_TEMPLATE,
        &[
            ("job_requirements", job_requirements),
            ("resume_text", &resume_text),
        ],
    );

    complete_json::<SkillsProfile>(llm, &prompt, &json_system(PROFILE_PERSONA))
        .await
        .map_err(|e| AppError::Llm(format!("Profile extraction failed: {e}")))
}
