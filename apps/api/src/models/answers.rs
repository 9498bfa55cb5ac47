//! Answer batches submitted by the candidate, one per exam section.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqAnswer {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub submitted_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoryAnswer {
    pub question: String,
    pub expected_answer: String,
    pub submitted_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingAnswer {
    pub question_name: String,
    pub question_description: String,
    pub submitted_code: String,
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitMcqRequest {
    pub candidate_id: Uuid,
    pub submitted_mcqs: Vec<McqAnswer>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitTheoryRequest {
    pub candidate_id: Uuid,
    pub submitted_theory_questions: Vec<TheoryAnswer>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitCodingRequest {
    pub candidate_id: Uuid,
    pub submitted_coding_questions: Vec<CodingAnswer>,
}
