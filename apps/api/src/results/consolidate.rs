//! Consolidated result: profile + graded MCQs + raw theory and coding batches.
//! Built on demand from persisted inputs; never stored incrementally.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::answers::{CodingAnswer, McqAnswer, TheoryAnswer};
use crate::models::profile::SkillsProfile;
use crate::session::artifact::ArtifactKind;
use crate::session::store::{read_json, SessionStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqResult {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub submitted_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqSummary {
    pub correct: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedResult {
    pub profile: SkillsProfile,
    pub mcq_summary: McqSummary,
    pub mcq_results: Vec<McqResult>,
    pub theory_results: Vec<TheoryAnswer>,
    pub coding_results: Vec<CodingAnswer>,
}

/// Exact string equality, no case or whitespace normalization.
pub fn grade_mcqs(answers: Vec<McqAnswer>) -> Vec<McqResult> {
    answers
        .into_iter()
        .map(|a| McqResult {
            is_correct: a.correct_answer == a.submitted_answer,
            question: a.question,
            options: a.options,
            correct_answer: a.correct_answer,
            submitted_answer: a.submitted_answer,
        })
        .collect()
}

pub fn consolidate(
    profile: SkillsProfile,
    mcq_answers: Vec<McqAnswer>,
    theory_answers: Vec<TheoryAnswer>,
    coding_answers: Vec<CodingAnswer>,
) -> ConsolidatedResult {
    let mcq_results = grade_mcqs(mcq_answers);
    let mcq_summary = McqSummary {
        correct: mcq_results.iter().filter(|r| r.is_correct).count(),
        total: mcq_results.len(),
    };
    ConsolidatedResult {
        profile,
        mcq_summary,
        mcq_results,
        theory_results: theory_answers,
        coding_results: coding_answers,
    }
}

/// Loads every input of the consolidated result. Any missing artifact is a
/// NotFound naming the stage that has not happened yet.
pub async fn load_consolidated(
    store: &dyn SessionStore,
    candidate_id: Uuid,
) -> Result<ConsolidatedResult, AppError> {
    let profile: SkillsProfile = load(store, candidate_id, ArtifactKind::Profile, "Profile").await?;
    let mcq: Vec<McqAnswer> = load(store, candidate_id, ArtifactKind::McqAnswers, "MCQ answers").await?;
    let theory: Vec<TheoryAnswer> =
        load(store, candidate_id, ArtifactKind::TheoryAnswers, "Theory answers").await?;
    let coding: Vec<CodingAnswer> =
        load(store, candidate_id, ArtifactKind::CodingAnswers, "Coding answers").await?;
    Ok(consolidate(profile, mcq, theory, coding))
}

async fn load<T: serde::de::DeserializeOwned>(
    store: &dyn SessionStore,
    candidate_id: Uuid,
    kind: ArtifactKind,
    label: &str,
) -> Result<T, AppError> {
    match read_json(store, candidate_id, &kind).await {
        Ok(value) => Ok(value),
        Err(e) if e.is_not_found() => Err(AppError::NotFound(format!(
            "{label} not found for candidate {candidate_id}"
        ))),
        Err(e) => Err(e.into()),
    }
}
