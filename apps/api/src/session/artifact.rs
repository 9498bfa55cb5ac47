//! Well-known artifact kinds and their paths inside a session.

use std::fmt;

/// Output area for everything produced after upload.
pub const OUTPUT_DIR: &str = "testoutput";
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Audio container formats accepted for the candidate introduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
    Webm,
    M4a,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Webm => "webm",
            AudioFormat::M4a => "m4a",
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" | "mpeg" => Some(AudioFormat::Mp3),
            "wav" | "wave" | "x-wav" => Some(AudioFormat::Wav),
            "ogg" | "oga" => Some(AudioFormat::Ogg),
            "webm" => Some(AudioFormat::Webm),
            "m4a" | "mp4" | "x-m4a" => Some(AudioFormat::M4a),
            _ => None,
        }
    }

    /// Resolves the format from the uploaded file name, then the content type.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Option<Self> {
        file_name
            .and_then(|name| name.rsplit_once('.'))
            .and_then(|(_, ext)| Self::from_extension(ext))
            .or_else(|| {
                content_type
                    .and_then(|ct| ct.strip_prefix("audio/"))
                    .map(|sub| sub.split(';').next().unwrap_or(sub).trim())
                    .and_then(Self::from_extension)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    Resume,
    JobDescription,
    Status,
    Audio(AudioFormat),
    Profile,
    Exam,
    McqAnswers,
    TheoryAnswers,
    CodingAnswers,
    FinalReport,
    /// Final bundle, keyed by the sanitized candidate name.
    Archive(String),
}

impl ArtifactKind {
    /// Path relative to the session root, always `/`-separated.
    pub fn relative_path(&self) -> String {
        match self {
            ArtifactKind::Resume => "resume.pdf".to_string(),
            ArtifactKind::JobDescription => "job_desc.json".to_string(),
            ArtifactKind::Status => "status.json".to_string(),
            ArtifactKind::Audio(format) => format!("audio.{}", format.extension()),
            ArtifactKind::Profile => format!("{OUTPUT_DIR}/profile.json"),
            ArtifactKind::Exam => "testoutput.json".to_string(),
            ArtifactKind::McqAnswers => format!("{OUTPUT_DIR}/submitted_mcq_answers.json"),
            ArtifactKind::TheoryAnswers => format!("{OUTPUT_DIR}/theory_answers.json"),
            ArtifactKind::CodingAnswers => format!("{OUTPUT_DIR}/coding_answers.json"),
            ArtifactKind::FinalReport => format!("{OUTPUT_DIR}/Final_Report.txt"),
            ArtifactKind::Archive(stem) => format!("{stem}.{ARCHIVE_EXTENSION}"),
        }
    }

    pub fn is_archive_path(relative_path: &str) -> bool {
        relative_path
            .rsplit_once('.')
            .map(|(_, ext)| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
            .unwrap_or(false)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_path())
    }
}
