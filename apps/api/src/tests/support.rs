use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use crate::config::Config;
use crate::extraction::prompts::PROFILE_PERSONA;
use crate::generation::prompts::EXAM_PERSONA;
use crate::llm_client::{LanguageModel, LlmError};
use crate::models::exam::fixtures;
use crate::results::prompts::REPORT_SYSTEM;
use crate::routes::build_router;
use crate::session::store::FsSessionStore;
use crate::state::AppState;

pub const RESUME: &[u8] = b"Ada Lovelace\n\xe2\x80\xa2 Rust\n\xe2\x80\xa2 SQL";

pub const BOUNDARY: &str = "proctor-test-boundary";

pub const REPORT: &str = "Candidate Name: Ada Lovelace\n\
MCQ Score: 1 out of 2\n\
    - knows the basics\n\n\
Overall Feedback:\n\
    - promising\n\n\
Marks: 9/17";

/// Which stage a model call belongs to, recognised from its system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Profile,
    Exam,
    Report,
}

/// In-process stand-in for the model. Replies per stage and records every prompt.
pub struct ScriptedModel {
    pub profile: String,
    pub exam: String,
    pub report: String,
    /// Delay before the exam reply.
    pub exam_delay: Duration,
    calls: Mutex<Vec<(Stage, String)>>,
}

impl ScriptedModel {
    /// Model producing a valid 2 MCQ / 1 theory / 1 coding exam for "Ada Lovelace".
    pub fn new() -> Self {
        Self {
            profile: json!({
                "name": "Ada Lovelace",
                "qualification": "BSc Mathematics",
                "technical_skills": ["Rust", "SQL"],
                "programming_languages": ["Rust"],
                "email": "ada@example.com",
                "exam_skills": {
                    "mandatory_skills": ["Rust"],
                    "important_skills": ["SQL"],
                    "unnecessary_skills": ["Photoshop"]
                }
            })
            .to_string(),
            exam: serde_json::to_string(&fixtures::exam(2, 1, 1)).unwrap_or_default(),
            report: REPORT.to_string(),
            exam_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_exam(mut self, exam: impl Into<String>) -> Self {
        self.exam = exam.into();
        self
    }

    pub fn with_exam_delay(mut self, delay: Duration) -> Self {
        self.exam_delay = delay;
        self
    }

    pub fn with_profile(mut self, profile: Value) -> Self {
        self.profile = profile.to_string();
        self
    }

    pub fn prompts(&self, stage: Stage) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let stage = if system == REPORT_SYSTEM {
            Stage::Report
        } else if system.starts_with(EXAM_PERSONA) {
            Stage::Exam
        } else if system.starts_with(PROFILE_PERSONA) {
            Stage::Profile
        } else {
            panic!("unexpected system prompt: {system}");
        };
        self.calls.lock().unwrap().push((stage, prompt.to_string()));

        match stage {
            Stage::Profile => Ok(self.profile.clone()),
            Stage::Exam => {
                if !self.exam_delay.is_zero() {
                    tokio::time::sleep(self.exam_delay).await;
                }
                Ok(self.exam.clone())
            }
            Stage::Report => Ok(self.report.clone()),
        }
    }
}

pub fn test_config(storage_dir: &Path) -> Config {
    Config {
        anthropic_api_key: "test-key".into(),
        llm_model: "test-model".into(),
        llm_max_tokens: 1024,
        storage_dir: storage_dir.to_path_buf(),
        port: 0,
        rust_log: "debug".into(),
        max_concurrent_generations: 2,
        max_pending_generations: 8,
        generation_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
    }
}

pub async fn test_state(config: Config, model: Arc<ScriptedModel>) -> AppState {
    let store = FsSessionStore::open(config.storage_dir.clone()).await.unwrap();
    AppState::new(Arc::new(store), model, config)
}

pub fn test_app(state: AppState) -> Router {
    build_router(state)
}

/// Job description asking for `mcq` / `theory` / `coding` questions worth 1 / 5 / 10 marks each.
pub fn job_description(mcq: u32, theory: u32, coding: u32) -> Value {
    json!({
        "requirements": "Backend engineer: Rust, SQL, REST APIs",
        "test_details": {
            "MCQ": {"no_of_questions": mcq, "marks_per_question": 1},
            "Theory": {"no_of_questions": theory, "marks_per_question": 5},
            "Coding": {"no_of_questions": coding, "marks_per_question": 10},
            "difficulty_level": "Beginner"
        }
    })
}

/// One multipart part: (field name, file name, content type, bytes).
pub type Part<'a> = (&'a str, &'a str, &'a str, &'a [u8]);

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content_type, data) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "body is not JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn error_code(&self) -> String {
        self.json()["error"]["code"].as_str().unwrap_or_default().to_string()
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        body: body.to_vec(),
    }
}

/// Uploads a plain-text resume with the given job description and returns the candidate id.
pub async fn upload(app: &Router, job: &Value) -> String {
    let job_bytes = serde_json::to_vec(job).unwrap();
    let response = send(
        app,
        multipart_request(
            "/upload_resume",
            &[
                ("resume", "resume.txt", "text/plain", RESUME),
                ("exam_details", "job.json", "application/json", job_bytes.as_slice()),
            ],
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.json());
    response.json()["candidate_id"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Polls the MCQ endpoint until it stops answering 202, the way the exam frontend does.
pub async fn poll_mcq(app: &Router, candidate_id: &str) -> TestResponse {
    for _ in 0..100 {
        let response = send(app, empty_request("GET", &format!("/get_mcq/{candidate_id}"))).await;
        if response.status != StatusCode::ACCEPTED {
            return response;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("generation for {candidate_id} never completed");
}
