//! Final report: free text from the model that must end with `Marks: <obtained>/<total>`.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::fill;
use crate::llm_client::{strip_fences, LanguageModel};
use crate::models::job::TestDetails;
use crate::results::consolidate::ConsolidatedResult;
use crate::results::prompts::{
    REPORT_PROMPT_TEMPLATE, REPORT_SYSTEM, TOTAL_MARKS_KNOWN, TOTAL_MARKS_UNKNOWN,
};

/// Model calls allowed for one report before finalize gives up.
const MAX_REPORT_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Marks {
    pub obtained: u32,
    pub total: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("report is empty")]
    Empty,

    #[error("last line is not 'Marks: <obtained>/<total>'")]
    MissingMarksLine,

    #[error("'Marks:' line appears {0} times")]
    DuplicateMarksLine(usize),

    #[error("obtained marks {obtained} exceed total {total}")]
    ObtainedExceedsTotal { obtained: u32, total: u32 },

    #[error("total marks {actual} differ from the configured {expected}")]
    TotalMismatch { expected: u32, actual: u32 },
}

fn marks_line() -> &'static Regex {
    static MARKS: OnceLock<Regex> = OnceLock::new();
    MARKS.get_or_init(|| {
        Regex::new(r"^[*_\s]*Marks:\s*(\d+)\s*/\s*(\d+)[*_\s]*$").expect("static regex is valid")
    })
}

/// Validates the trailing marks line and returns the parsed marks.
pub fn check_report(text: &str, expected_total: Option<u32>) -> Result<Marks, ReportError> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let last = lines.last().ok_or(ReportError::Empty)?;

    let occurrences = lines.iter().filter(|l| marks_line().is_match(l)).count();
    let captures = marks_line()
        .captures(last)
        .ok_or(ReportError::MissingMarksLine)?;
    if occurrences > 1 {
        return Err(ReportError::DuplicateMarksLine(occurrences));
    }

    let parse = |i: usize| -> Result<u32, ReportError> {
        captures[i]
            .parse::<u32>()
            .map_err(|_| ReportError::MissingMarksLine)
    };
    let marks = Marks {
        obtained: parse(1)?,
        total: parse(2)?,
    };

    if marks.obtained > marks.total {
        return Err(ReportError::ObtainedExceedsTotal {
            obtained: marks.obtained,
            total: marks.total,
        });
    }
    if let Some(expected) = expected_total {
        if expected != marks.total {
            return Err(ReportError::TotalMismatch {
                expected,
                actual: marks.total,
            });
        }
    }
    Ok(marks)
}

/// Asks the model for the report, re-asking while the reply breaks the marks contract.
pub async fn generate_report(
    llm: &dyn LanguageModel,
    consolidated: &ConsolidatedResult,
    test_details: &TestDetails,
) -> Result<(String, Marks), AppError> {
    let prompt = build_report_prompt(consolidated, test_details)?;
    let expected_total = test_details.total_marks();

    let mut last_problem = None;
    for attempt in 1..=MAX_REPORT_ATTEMPTS {
        let reply = llm
            .complete(&prompt, REPORT_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Report generation failed: {e}")))?;
        let report = strip_fences(&reply).to_string();

        match check_report(&report, expected_total) {
            Ok(marks) => {
                info!("Report generated: {}/{}", marks.obtained, marks.total);
                return Ok((report, marks));
            }
            Err(problem) => {
                warn!("Report attempt {attempt}/{MAX_REPORT_ATTEMPTS} rejected: {problem}");
                last_problem = Some(problem);
            }
        }
    }

    Err(AppError::Llm(format!(
        "Report broke the marks contract after {MAX_REPORT_ATTEMPTS} attempts: {}",
        last_problem.map(|p| p.to_string()).unwrap_or_default()
    )))
}

fn build_report_prompt(
    consolidated: &ConsolidatedResult,
    test_details: &TestDetails,
) -> Result<String, AppError> {
    let consolidated_json = serde_json::to_string_pretty(consolidated).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to serialize consolidated result: {e}"))
    })?;
    let test_details_json = serde_json::to_string_pretty(test_details)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize test details: {e}")))?;
    let total_marks_rule = match test_details.total_marks() {
        Some(total) => TOTAL_MARKS_KNOWN.replace("{total}", &total.to_string()),
        None => TOTAL_MARKS_UNKNOWN.to_string(),
    };

    Ok(fill(
        REPORT_PROMPT_TEMPLATE,
        &[
            ("total_marks_rule", &total_marks_rule),
            ("test_details_json", &test_details_json),
            ("consolidated_json", &consolidated_json),
        ],
    ))
}
