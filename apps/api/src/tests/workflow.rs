use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use zip::ZipArchive;

use super::support::*;

async fn app_with(model: ScriptedModel) -> (TempDir, Arc<ScriptedModel>, Router) {
    let tmp = TempDir::new().unwrap();
    let model = Arc::new(model);
    let state = test_state(test_config(&tmp.path().join("storage")), model.clone()).await;
    (tmp, model, test_app(state))
}

/// Answers every MCQ, getting only the first one right.
fn mcq_submission(candidate_id: &str, questions: &Value) -> Value {
    let answers: Vec<Value> = questions
        .as_array()
        .unwrap()
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let submitted = if i == 0 {
                q["answer"].clone()
            } else {
                json!("definitely wrong")
            };
            json!({
                "question": q["question"],
                "options": q["options"],
                "correct_answer": q["answer"],
                "submitted_answer": submitted
            })
        })
        .collect();
    json!({"candidate_id": candidate_id, "submitted_mcqs": answers})
}

fn theory_submission(candidate_id: &str) -> Value {
    json!({
        "candidate_id": candidate_id,
        "submitted_theory_questions": [{
            "question": "Explain concept 0",
            "expected_answer": "Concept 0 is ...",
            "submitted_answer": "It is about ownership"
        }]
    })
}

fn coding_submission(candidate_id: &str) -> Value {
    json!({
        "candidate_id": candidate_id,
        "submitted_coding_questions": [{
            "question_name": "Problem 0",
            "question_description": "Solve Problem 0",
            "submitted_code": "fn main() {}",
            "language": "rust"
        }]
    })
}

async fn submit_all(app: &Router, candidate_id: &str, mcqs: &Value) {
    for (uri, payload) in [
        ("/submit_all_mcq_answers/", mcq_submission(candidate_id, mcqs)),
        ("/submit_all_theory_answers/", theory_submission(candidate_id)),
        ("/submit_all_coding_answers/", coding_submission(candidate_id)),
    ] {
        let response = send(app, json_request("POST", uri, &payload)).await;
        assert_eq!(response.status, StatusCode::OK, "{uri}: {:?}", response.json());
    }
}

fn archive_entries(bytes: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

// ────────────────────────────────────────────────────────────────────────────
// Full session
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_full_session_produces_report_and_archive() {
    let (_tmp, model, app) = app_with(ScriptedModel::new()).await;
    let id = upload(&app, &job_description(2, 1, 1)).await;

    let mcqs = poll_mcq(&app, &id).await;
    assert_eq!(mcqs.status, StatusCode::OK);
    let mcqs = mcqs.json();
    assert_eq!(mcqs.as_array().unwrap().len(), 2);

    let theory = send(&app, empty_request("GET", &format!("/get_theory_question/{id}"))).await;
    assert_eq!(theory.json().as_array().unwrap().len(), 1);
    let coding = send(&app, empty_request("GET", &format!("/get_coding_question/{id}"))).await;
    assert_eq!(coding.json().as_array().unwrap().len(), 1);
    assert!(coding.json()[0]["examples"].as_array().unwrap().len() >= 2);

    let audio = send(
        &app,
        multipart_request(
            &format!("/upload_audio/{id}"),
            &[("audio", "answer.webm", "audio/webm", b"webm-bytes".as_slice())],
        ),
    )
    .await;
    assert_eq!(audio.status, StatusCode::OK);
    assert_eq!(audio.json()["message"], "Audio uploaded successfully!");

    submit_all(&app, &id, &mcqs).await;

    let status = send(&app, empty_request("GET", &format!("/session_status/{id}"))).await;
    let status = status.json();
    assert_eq!(status["state"], "EXAM_READY");
    assert_eq!(status["answers"], json!({"mcq": true, "theory": true, "coding": true}));
    assert_eq!(status["final_report"], false);

    let result = send(
        &app,
        empty_request("POST", &format!("/generate_final_result/?candidate_id={id}")),
    )
    .await;
    assert_eq!(result.status, StatusCode::OK, "{:?}", result.json());
    let result = result.json();
    assert_eq!(result["message"], "Final result ZIP generated successfully!");
    assert_eq!(result["candidate_name"], "Ada_Lovelace");
    assert!(result["zip_path"].as_str().unwrap().ends_with("Ada_Lovelace.zip"));

    // The report prompt sees the deterministic MCQ grading.
    let report_prompts = model.prompts(Stage::Report);
    assert_eq!(report_prompts.len(), 1);
    let prompt = &report_prompts[0];
    assert!(prompt.contains("\"correct\": 1"));
    assert!(prompt.contains("\"total\": 2"));
    assert!(prompt.contains("worth 17 marks"));
    assert!(prompt.contains("It is about ownership"));

    let report = send(
        &app,
        empty_request("GET", &format!("/get_final_report/?candidate_id={id}")),
    )
    .await;
    assert_eq!(report.status, StatusCode::OK);
    assert_eq!(report.json()["candidate_id"], id.as_str());
    assert_eq!(report.json()["final_report"], REPORT);

    let download = send(&app, empty_request("GET", &format!("/download_zip/?candidate_id={id}"))).await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.headers[header::CONTENT_TYPE], "application/zip");
    assert_eq!(
        download.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Ada_Lovelace.zip\""
    );
    assert_eq!(
        archive_entries(&download.body),
        vec![
            "audio.webm",
            "job_desc.json",
            "resume.pdf",
            "status.json",
            "testoutput.json",
            "testoutput/Final_Report.txt",
            "testoutput/coding_answers.json",
            "testoutput/profile.json",
            "testoutput/submitted_mcq_answers.json",
            "testoutput/theory_answers.json",
        ]
    );

    // The archived status already reflects the finalized session.
    let mut archive = ZipArchive::new(Cursor::new(download.body.clone())).unwrap();
    let mut archived_status = String::new();
    archive
        .by_name("status.json")
        .unwrap()
        .read_to_string(&mut archived_status)
        .unwrap();
    let archived_status: Value = serde_json::from_str(&archived_status).unwrap();
    assert_eq!(archived_status["state"], "FINALIZED");
    assert_eq!(archived_status["archive"], "Ada_Lovelace.zip");

    let status = send(&app, empty_request("GET", &format!("/session_status/{id}"))).await;
    let status = status.json();
    assert_eq!(status["state"], "FINALIZED");
    assert_eq!(status["archive"], "Ada_Lovelace.zip");
    assert_eq!(status["final_report"], true);
}

#[tokio::test]
async fn test_refinalizing_does_not_nest_archives() {
    let (_tmp, model, app) = app_with(ScriptedModel::new()).await;
    let id = upload(&app, &job_description(2, 1, 1)).await;
    let mcqs = poll_mcq(&app, &id).await.json();
    submit_all(&app, &id, &mcqs).await;

    let uri = format!("/generate_final_result/?candidate_id={id}");
    assert_eq!(send(&app, empty_request("POST", &uri)).await.status, StatusCode::OK);
    assert_eq!(send(&app, empty_request("POST", &uri)).await.status, StatusCode::OK);
    assert_eq!(model.prompts(Stage::Report).len(), 2);

    let download = send(&app, empty_request("GET", &format!("/download_zip/?candidate_id={id}"))).await;
    assert!(archive_entries(&download.body)
        .iter()
        .all(|name| !name.ends_with(".zip")));
}

#[tokio::test]
async fn test_nameless_profile_falls_back_to_candidate() {
    let model = ScriptedModel::new().with_profile(json!({
        "name": "",
        "exam_skills": {"mandatory_skills": ["Rust"]}
    }));
    let (_tmp, _model, app) = app_with(model).await;
    let id = upload(&app, &job_description(2, 1, 1)).await;
    let mcqs = poll_mcq(&app, &id).await.json();
    submit_all(&app, &id, &mcqs).await;

    let result = send(
        &app,
        empty_request("POST", &format!("/generate_final_result/?candidate_id={id}")),
    )
    .await;
    assert_eq!(result.json()["candidate_name"], "Candidate");

    let download = send(&app, empty_request("GET", &format!("/download_zip/?candidate_id={id}"))).await;
    assert_eq!(
        download.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Candidate.zip\""
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Readiness and failures
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_questions_are_not_ready_while_generating() {
    let model = ScriptedModel::new().with_exam_delay(Duration::from_secs(5));
    let (_tmp, _model, app) = app_with(model).await;
    let id = upload(&app, &job_description(2, 1, 1)).await;

    for uri in [
        format!("/get_mcq/{id}"),
        format!("/get_theory_question/{id}"),
        format!("/get_coding_question/{id}"),
    ] {
        let response = send(&app, empty_request("GET", &uri)).await;
        assert_eq!(response.status, StatusCode::ACCEPTED, "{uri}");
        assert_eq!(response.error_code(), "NOT_READY");
    }

    let finalize = send(
        &app,
        empty_request("POST", &format!("/generate_final_result/?candidate_id={id}")),
    )
    .await;
    assert_eq!(finalize.status, StatusCode::ACCEPTED);

    let status = send(&app, empty_request("GET", &format!("/session_status/{id}"))).await;
    let state = status.json()["state"].as_str().unwrap().to_string();
    assert!(state == "CREATED" || state == "GENERATING", "state was {state}");
}

#[tokio::test]
async fn test_unparsable_exam_marks_generation_failed() {
    let (_tmp, _model, app) = app_with(ScriptedModel::new().with_exam("no exam today")).await;
    let id = upload(&app, &job_description(2, 1, 1)).await;

    let response = poll_mcq(&app, &id).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_code(), "GENERATION_FAILED");

    let status = send(&app, empty_request("GET", &format!("/session_status/{id}"))).await;
    let status = status.json();
    assert_eq!(status["state"], "GENERATION_FAILED");
    assert!(status["failure"].as_str().unwrap().contains("Exam generation failed"));
}

#[tokio::test]
async fn test_exam_with_wrong_counts_is_never_served() {
    let wrong = serde_json::to_string(&crate::models::exam::fixtures::exam(3, 1, 1)).unwrap();
    let (_tmp, model, app) = app_with(ScriptedModel::new().with_exam(wrong)).await;
    let id = upload(&app, &job_description(2, 1, 1)).await;

    let response = poll_mcq(&app, &id).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json()["error"]["message"]
        .as_str()
        .unwrap()
        .contains("MCQ: expected 2 questions, got 3"));
    assert_eq!(response.error_code(), "GENERATION_FAILED");
    assert_eq!(model.prompts(Stage::Exam).len(), 1);
}

#[tokio::test]
async fn test_busy_server_rejects_upload_without_creating_session() {
    let tmp = TempDir::new().unwrap();
    let storage = tmp.path().join("storage");
    let mut config = test_config(&storage);
    config.max_concurrent_generations = 1;
    config.max_pending_generations = 1;
    let model = Arc::new(ScriptedModel::new().with_exam_delay(Duration::from_secs(5)));
    let app = test_app(test_state(config, model).await);

    upload(&app, &job_description(2, 1, 1)).await;

    let job = serde_json::to_vec(&job_description(2, 1, 1)).unwrap();
    let response = send(
        &app,
        multipart_request(
            "/upload_resume",
            &[
                ("resume", "resume.txt", "text/plain", RESUME),
                ("exam_details", "job.json", "application/json", job.as_slice()),
            ],
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.error_code(), "BUSY");
    assert_eq!(std::fs::read_dir(&storage).unwrap().count(), 1);
}

// ────────────────────────────────────────────────────────────────────────────
// Answers and finalize preconditions
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_finalize_requires_every_answer_batch() {
    let (_tmp, model, app) = app_with(ScriptedModel::new()).await;
    let id = upload(&app, &job_description(2, 1, 1)).await;
    let mcqs = poll_mcq(&app, &id).await.json();

    send(&app, json_request("POST", "/submit_all_mcq_answers/", &mcq_submission(&id, &mcqs))).await;
    send(&app, json_request("POST", "/submit_all_theory_answers/", &theory_submission(&id))).await;

    let finalize = send(
        &app,
        empty_request("POST", &format!("/generate_final_result/?candidate_id={id}")),
    )
    .await;
    assert_eq!(finalize.status, StatusCode::NOT_FOUND);
    assert!(finalize.json()["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Coding answers"));
    assert!(model.prompts(Stage::Report).is_empty());

    let report = send(&app, empty_request("GET", &format!("/get_final_report/?candidate_id={id}"))).await;
    assert_eq!(report.status, StatusCode::NOT_FOUND);
    assert_eq!(
        report.json()["error"]["message"],
        "Final report not found. Please generate it first."
    );

    let download = send(&app, empty_request("GET", &format!("/download_zip/?candidate_id={id}"))).await;
    assert_eq!(download.status, StatusCode::NOT_FOUND);
    assert_eq!(
        download.json()["error"]["message"],
        "ZIP file not found. Please generate it first."
    );
}

#[tokio::test]
async fn test_resubmitted_batch_replaces_previous_one() {
    let (_tmp, model, app) = app_with(ScriptedModel::new()).await;
    let id = upload(&app, &job_description(2, 1, 1)).await;
    let mcqs = poll_mcq(&app, &id).await.json();
    submit_all(&app, &id, &mcqs).await;

    // Second MCQ batch answers everything correctly.
    let mut all_right = mcq_submission(&id, &mcqs);
    for answer in all_right["submitted_mcqs"].as_array_mut().unwrap() {
        answer["submitted_answer"] = answer["correct_answer"].clone();
    }
    let response = send(&app, json_request("POST", "/submit_all_mcq_answers/", &all_right)).await;
    assert_eq!(response.json()["message"], "All MCQ answers submitted successfully!");

    send(
        &app,
        empty_request("POST", &format!("/generate_final_result/?candidate_id={id}")),
    )
    .await;
    let prompt = &model.prompts(Stage::Report)[0];
    assert!(prompt.contains("\"correct\": 2"));
}

#[tokio::test]
async fn test_unknown_candidate_is_not_found_everywhere() {
    let (_tmp, _model, app) = app_with(ScriptedModel::new()).await;
    let id = uuid::Uuid::new_v4().to_string();

    let requests = vec![
        empty_request("GET", &format!("/get_mcq/{id}")),
        empty_request("GET", &format!("/get_theory_question/{id}")),
        empty_request("GET", &format!("/session_status/{id}")),
        empty_request("POST", &format!("/generate_final_result/?candidate_id={id}")),
        empty_request("GET", &format!("/download_zip/?candidate_id={id}")),
        empty_request("GET", &format!("/get_final_report/?candidate_id={id}")),
        json_request("POST", "/submit_all_theory_answers/", &theory_submission(&id)),
        multipart_request(
            &format!("/upload_audio/{id}"),
            &[("audio", "a.mp3", "audio/mpeg", b"mp3".as_slice())],
        ),
    ];
    for request in requests {
        let uri = request.uri().to_string();
        let response = send(&app, request).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.error_code(), "NOT_FOUND", "{uri}");
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Upload validation
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_rejects_bad_exam_details() {
    let (tmp, _model, app) = app_with(ScriptedModel::new()).await;

    let mut unknown_level = job_description(2, 1, 1);
    unknown_level["test_details"]["difficulty_level"] = json!("Wizard");
    let mut huge_count = job_description(2, 1, 1);
    huge_count["test_details"]["MCQ"]["no_of_questions"] = json!(u32::MAX);
    let cases = [
        unknown_level,
        huge_count,
        job_description(0, 0, 0),
        json!({"test_details": {}}),
    ];
    for job in cases {
        let bytes = serde_json::to_vec(&job).unwrap();
        let response = send(
            &app,
            multipart_request(
                "/upload_resume",
                &[
                    ("resume", "resume.txt", "text/plain", RESUME),
                    ("exam_details", "job.json", "application/json", bytes.as_slice()),
                ],
            ),
        )
        .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{job}");
        assert_eq!(response.error_code(), "VALIDATION_ERROR");
    }

    let missing = send(
        &app,
        multipart_request("/upload_resume", &[("resume", "resume.txt", "text/plain", RESUME)]),
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    // Nothing was admitted, so no session exists.
    assert_eq!(std::fs::read_dir(tmp.path().join("storage")).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unsupported_audio_format_is_rejected() {
    let (_tmp, _model, app) = app_with(ScriptedModel::new()).await;
    let id = upload(&app, &job_description(2, 1, 1)).await;

    let response = send(
        &app,
        multipart_request(
            &format!("/upload_audio/{id}"),
            &[("audio", "notes.txt", "text/plain", b"hello".as_slice())],
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let (_tmp, _model, app) = app_with(ScriptedModel::new()).await;
    let response = send(&app, empty_request("GET", "/health")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "ok");
}
