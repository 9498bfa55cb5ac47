pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::answers::handlers as answers;
use crate::generation::handlers as questions;
use crate::results::handlers as results;
use crate::session::handlers as session;
use crate::state::AppState;

/// `{"message": …}` acknowledgement shared by the write endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/upload_resume", post(session::handle_upload_resume))
        .route(
            "/upload_audio/:candidate_id",
            post(session::handle_upload_audio),
        )
        .route(
            "/session_status/:candidate_id",
            get(session::handle_session_status),
        )
        // Generated questions
        .route("/get_mcq/:candidate_id", get(questions::handle_get_mcq))
        .route(
            "/get_theory_question/:candidate_id",
            get(questions::handle_get_theory),
        )
        .route(
            "/get_coding_question/:candidate_id",
            get(questions::handle_get_coding),
        )
        // Answer batches
        .route("/submit_all_mcq_answers/", post(answers::handle_submit_mcq))
        .route(
            "/submit_all_theory_answers/",
            post(answers::handle_submit_theory),
        )
        .route(
            "/submit_all_coding_answers/",
            post(answers::handle_submit_coding),
        )
        // Finalize
        .route(
            "/generate_final_result/",
            post(results::handle_generate_final_result),
        )
        .route("/download_zip/", get(results::handle_download_zip))
        .route("/get_final_report/", get(results::handle_get_final_report))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
