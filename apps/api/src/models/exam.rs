//! Generated exam: MCQ, theory and coding sets produced in a single model call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::job::TestDetails;
use crate::models::profile::SkillsProfile;

pub const MCQ_OPTION_COUNT: usize = 4;
pub const MIN_CODING_EXAMPLES: usize = 2;
pub const MIN_CODING_TEST_CASES: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    /// Must be one of `options`, verbatim.
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoryQuestion {
    pub question: String,
    pub expected_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingQuestion {
    pub name: String,
    pub description: String,
    pub examples: Vec<TestCase>,
    pub test_cases: Vec<TestCase>,
}

/// Written once by the generation task and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub level: String,
    pub mcq_questions: Vec<Mcq>,
    pub theory_questions: Vec<TheoryQuestion>,
    pub coding_questions: Vec<CodingQuestion>,
    /// Attached after generation; absent in the raw model reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<SkillsProfile>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExamValidationError {
    #[error("{section}: expected {expected} questions, got {actual}")]
    CountMismatch {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("MCQ {index}: expected 4 options, got {actual}")]
    OptionCount { index: usize, actual: usize },

    #[error("MCQ {index}: correct answer is not one of the options")]
    AnswerNotAnOption { index: usize },

    #[error("Coding question {index}: needs at least 2 examples, got {actual}")]
    TooFewExamples { index: usize, actual: usize },

    #[error("Coding question {index}: needs at least 1 test case")]
    MissingTestCases { index: usize },
}

impl Exam {
    /// Structural checks against the requested plan. The exam is accepted or
    /// rejected as a whole; no set is repaired on its own.
    pub fn validate(&self, plan: &TestDetails) -> Result<(), ExamValidationError> {
        check_count("MCQ", plan.mcq.no_of_questions, self.mcq_questions.len())?;
        check_count(
            "Theory",
            plan.theory.no_of_questions,
            self.theory_questions.len(),
        )?;
        check_count(
            "Coding",
            plan.coding.no_of_questions,
            self.coding_questions.len(),
        )?;

        for (index, mcq) in self.mcq_questions.iter().enumerate() {
            if mcq.options.len() != MCQ_OPTION_COUNT {
                return Err(ExamValidationError::OptionCount {
                    index,
                    actual: mcq.options.len(),
                });
            }
            if !mcq.options.contains(&mcq.answer) {
                return Err(ExamValidationError::AnswerNotAnOption { index });
            }
        }

        for (index, coding) in self.coding_questions.iter().enumerate() {
            if coding.examples.len() < MIN_CODING_EXAMPLES {
                return Err(ExamValidationError::TooFewExamples {
                    index,
                    actual: coding.examples.len(),
                });
            }
            if coding.test_cases.len() < MIN_CODING_TEST_CASES {
                return Err(ExamValidationError::MissingTestCases { index });
            }
        }

        Ok(())
    }
}

fn check_count(
    section: &'static str,
    expected: u32,
    actual: usize,
) -> Result<(), ExamValidationError> {
    let expected = expected as usize;
    if expected != actual {
        return Err(ExamValidationError::CountMismatch {
            section,
            expected,
            actual,
        });
    }
    Ok(())
}
