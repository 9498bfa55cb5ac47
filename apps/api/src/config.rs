use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a numeric one is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub storage_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    /// Generation tasks allowed to talk to the model at the same time.
    pub max_concurrent_generations: usize,
    /// Generation jobs admitted (running or waiting). Uploads beyond this get 503.
    pub max_pending_generations: usize,
    pub generation_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_model: std::env::var("LLM_MODEL")
                .unwrap_or_else(|_| crate::llm_client::DEFAULT_MODEL.to_string()),
            llm_max_tokens: parse_env("LLM_MAX_TOKENS", 8192)?,
            storage_dir: std::env::var("STORAGE_DIR")
                .unwrap_or_else(|_| "storage".to_string())
                .into(),
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_concurrent_generations: parse_env("MAX_CONCURRENT_GENERATIONS", 4)?,
            max_pending_generations: parse_env("MAX_PENDING_GENERATIONS", 32)?,
            generation_timeout_secs: parse_env("GENERATION_TIMEOUT_SECS", 600)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
