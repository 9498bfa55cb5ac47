//! Skills profile derived from the resume and job requirements.

use serde::{Deserialize, Serialize};

/// Placeholder used when the profile carries no usable candidate name.
pub const FALLBACK_CANDIDATE_NAME: &str = "Candidate";

/// Skills to examine, partitioned by how much they matter for the role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSkills {
    #[serde(default)]
    pub mandatory_skills: Vec<String>,
    #[serde(default)]
    pub important_skills: Vec<String>,
    #[serde(default)]
    pub unnecessary_skills: Vec<String>,
}

/// Produced once by the extractor; read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub programming_languages: Vec<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact_no: String,
    #[serde(default)]
    pub skills_in_jd: Vec<String>,
    #[serde(default)]
    pub exam_skills: ExamSkills,
}

impl SkillsProfile {
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            FALLBACK_CANDIDATE_NAME
        } else {
            name
        }
    }

    /// Display name made safe for use as a file stem: spaces and anything outside
    /// `[A-Za-z0-9_-]` become `_`.
    pub fn file_stem(&self) -> String {
        sanitize_file_stem(self.display_name())
    }
}

pub fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.chars().all(|c| c == '_') {
        FALLBACK_CANDIDATE_NAME.to_string()
    } else {
        stem
    }
}
