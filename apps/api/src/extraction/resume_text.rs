//! Best-effort plain text from an uploaded resume.
//!
//! Failures never abort the pipeline: they degrade into a diagnostic string that
//! flows into the profile prompt instead of resume content.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Extracts and normalizes resume text. Never fails.
pub async fn extract_resume_text(bytes: Vec<u8>) -> String {
    let raw = if bytes.starts_with(PDF_MAGIC) {
        // pdf-extract is CPU-bound and can panic on malformed input; keep it off the runtime.
        match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("PDF text extraction failed: {e}");
                format!("Error reading PDF: {e}")
            }
            Err(e) => {
                warn!("PDF text extraction aborted: {e}");
                format!("Error reading PDF: {e}")
            }
        }
    } else {
        match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                warn!("Resume is neither PDF nor UTF-8 text");
                "Error reading resume: unsupported document format".to_string()
            }
        }
    };
    clean_resume_text(&raw)
}

/// Collapses every run of newlines and bullet glyphs into a single newline and trims.
pub fn clean_resume_text(text: &str) -> String {
    static BREAKS: OnceLock<Regex> = OnceLock::new();
    let breaks = BREAKS.get_or_init(|| Regex::new(r"[•\r\n]+").expect("static regex is valid"));
    breaks.replace_all(text, "\n").trim().to_string()
}
