//! Job description record uploaded by the examiner alongside the resume.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered difficulty scale. Drives both the MCQ style and the coding-problem rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Master,
}

impl DifficultyLevel {
    #[cfg(test)]
    pub const ALL: [DifficultyLevel; 5] = [
        DifficultyLevel::Beginner,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Advanced,
        DifficultyLevel::Expert,
        DifficultyLevel::Master,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "Beginner",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
            DifficultyLevel::Expert => "Expert",
            DifficultyLevel::Master => "Master",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper bound on questions requested per section.
pub const MAX_QUESTIONS_PER_SECTION: u32 = 50;
pub const MAX_MARKS_PER_QUESTION: u32 = 100;

/// Question count (and optional per-question marks) for one exam section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPlan {
    pub no_of_questions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks_per_question: Option<u32>,
}

impl SectionPlan {
    /// `None` when marks are not configured or the product overflows.
    pub fn total_marks(&self) -> Option<u32> {
        self.marks_per_question?.checked_mul(self.no_of_questions)
    }

    fn validate(&self, section: &str) -> Result<(), String> {
        if self.no_of_questions > MAX_QUESTIONS_PER_SECTION {
            return Err(format!(
                "{section}: no_of_questions must be at most {MAX_QUESTIONS_PER_SECTION}, got {}",
                self.no_of_questions
            ));
        }
        match self.marks_per_question {
            Some(marks) if marks > MAX_MARKS_PER_QUESTION => Err(format!(
                "{section}: marks_per_question must be at most {MAX_MARKS_PER_QUESTION}, got {marks}"
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDetails {
    #[serde(rename = "MCQ")]
    pub mcq: SectionPlan,
    #[serde(rename = "Theory")]
    pub theory: SectionPlan,
    #[serde(rename = "Coding")]
    pub coding: SectionPlan,
    pub difficulty_level: DifficultyLevel,
}

impl TestDetails {
    fn sections(&self) -> [(&'static str, &SectionPlan); 3] {
        [
            ("MCQ", &self.mcq),
            ("Theory", &self.theory),
            ("Coding", &self.coding),
        ]
    }

    pub fn total_questions(&self) -> u32 {
        self.sections()
            .iter()
            .fold(0u32, |acc, (_, plan)| acc.saturating_add(plan.no_of_questions))
    }

    /// Total marks of the exam, known only when every section declares its marks.
    pub fn total_marks(&self) -> Option<u32> {
        self.sections()
            .iter()
            .try_fold(0u32, |acc, (_, plan)| acc.checked_add(plan.total_marks()?))
    }
}

/// Immutable once uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescription {
    pub requirements: String,
    pub test_details: TestDetails,
}

impl JobDescription {
    /// Checks what serde cannot: a usable requirements text and a bounded,
    /// non-empty question plan.
    pub fn validate(&self) -> Result<(), String> {
        if self.requirements.trim().is_empty() {
            return Err("requirements cannot be empty".to_string());
        }
        for (section, plan) in self.test_details.sections() {
            plan.validate(section)?;
        }
        if self.test_details.total_questions() == 0 {
            return Err("test_details must request at least one question".to_string());
        }
        Ok(())
    }
}
