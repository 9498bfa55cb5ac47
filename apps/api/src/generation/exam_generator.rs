//! Exam Generator: skills breakdown + test plan -> complete `Exam` in one model call.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::prompts::{rubric, EXAM_PERSONA, EXAM_PROMPT_TEMPLATE};
use crate::llm_client::prompts::{fill, json_system};
use crate::llm_client::{complete_json, LanguageModel};
use crate::models::exam::Exam;
use crate::models::job::TestDetails;
use crate::models::profile::ExamSkills;

/// Generates all three question sets in one call. Either the whole exam is valid
/// or the call fails; sets are never regenerated one at a time.
pub async fn generate_exam(
    llm: &dyn LanguageModel,
    skills: &ExamSkills,
    plan: &TestDetails,
) -> Result<Exam, AppError> {
    let prompt = build_exam_prompt(skills, plan)?;

    let exam: Exam = complete_json(llm, &prompt, &json_system(EXAM_PERSONA))
        .await
        .map_err(|e| AppError::Llm(format!("Exam generation failed: {e}")))?;

    if let Err(problem) = exam.validate(plan) {
        warn!("Generated exam rejected: {problem}");
        return Err(AppError::GenerationFailed(format!(
            "Generated exam is invalid: {problem}"
        )));
    }

    info!(
        "Exam generated: {} MCQ, {} theory, {} coding at {}",
        exam.mcq_questions.len(),
        exam.theory_questions.len(),
        exam.coding_questions.len(),
        plan.difficulty_level
    );
    Ok(exam)
}

fn build_exam_prompt(skills: &ExamSkills, plan: &TestDetails) -> Result<String, AppError> {
    let skills_json = serde_json::to_string_pretty(skills)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize skills: {e}")))?;
    let level = plan.difficulty_level;
    let rubric = rubric(level);

    Ok(fill(
        EXAM_PROMPT_TEMPLATE,
        &[
            ("level", level.as_str()),
            ("mcq_count", &plan.mcq.no_of_questions.to_string()),
            ("theory_count", &plan.theory.no_of_questions.to_string()),
            ("coding_count", &plan.coding.no_of_questions.to_string()),
            ("mcq_rubric", rubric.mcq),
            ("theory_rubric", rubric.theory),
            ("coding_rubric", rubric.coding),
            ("skills_json", &skills_json),
        ],
    ))
}
