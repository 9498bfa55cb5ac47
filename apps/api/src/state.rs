use std::sync::Arc;

use crate::config::Config;
use crate::generation::queue::GenerationQueue;
use crate::llm_client::LanguageModel;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    /// Every model call (profile, exam, report) goes through this handle.
    pub llm: Arc<dyn LanguageModel>,
    /// Bounded background generation; shares `store` and `llm`.
    pub generation: GenerationQueue,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn SessionStore>, llm: Arc<dyn LanguageModel>, config: Config) -> Self {
        let generation = GenerationQueue::new(
            store.clone(),
            llm.clone(),
            config.max_concurrent_generations,
            config.max_pending_generations,
            std::time::Duration::from_secs(config.generation_timeout_secs),
        );
        Self {
            store,
            llm,
            generation,
            config,
        }
    }
}
