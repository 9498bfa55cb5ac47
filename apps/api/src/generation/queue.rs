//! Bounded generation queue in front of the model.
//!
//! Admission permits cap how many generation jobs exist at all (running or
//! waiting); worker permits cap how many of them call the model at once.
//! Every job ends with its outcome recorded in the session status.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::task::run_generation;
use crate::llm_client::LanguageModel;
use crate::session::artifact::ArtifactKind;
use crate::session::status::{save_status, SessionState, SessionStatus};
use crate::session::store::SessionStore;

/// Proof that a job slot was reserved. Released when the job ends or the ticket is dropped.
#[derive(Debug)]
pub struct Ticket(#[allow(dead_code)] OwnedSemaphorePermit);

#[derive(Clone)]
pub struct GenerationQueue {
    admission: Arc<Semaphore>,
    workers: Arc<Semaphore>,
    max_pending: usize,
    timeout: Duration,
    store: Arc<dyn SessionStore>,
    llm: Arc<dyn LanguageModel>,
}

impl GenerationQueue {
    pub fn new(
        store: Arc<dyn SessionStore>,
        llm: Arc<dyn LanguageModel>,
        max_concurrent: usize,
        max_pending: usize,
        timeout: Duration,
    ) -> Self {
        let max_concurrent = max_concurrent.max(1);
        let max_pending = max_pending.max(max_concurrent);
        Self {
            admission: Arc::new(Semaphore::new(max_pending)),
            workers: Arc::new(Semaphore::new(max_concurrent)),
            max_pending,
            timeout,
            store,
            llm,
        }
    }

    /// Reserves a job slot or rejects immediately. Call before creating the session.
    pub fn reserve(&self) -> Result<Ticket, AppError> {
        match self.admission.clone().try_acquire_owned() {
            Ok(permit) => Ok(Ticket(permit)),
            Err(TryAcquireError::NoPermits) => Err(AppError::Busy(format!(
                "{} exam generations already in progress. Please retry later.",
                self.max_pending
            ))),
            Err(TryAcquireError::Closed) => Err(AppError::Internal(anyhow::anyhow!(
                "generation queue is closed"
            ))),
        }
    }

    /// Jobs admitted and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.max_pending - self.admission.available_permits()
    }

    /// Runs generation for `candidate_id` in the background. Never awaited by the request.
    pub fn spawn(&self, candidate_id: Uuid, ticket: Ticket) -> JoinHandle<()> {
        let queue = self.clone();
        tokio::spawn(async move {
            let _ticket = ticket;
            let failure = match queue.run(candidate_id).await {
                Ok(()) => return,
                Err(cause) => cause,
            };

            error!(candidate_id = %candidate_id, "Exam generation failed: {failure}");
            if let Err(e) = save_status(
                queue.store.as_ref(),
                candidate_id,
                &SessionStatus::failed(failure),
            )
            .await
            {
                error!(candidate_id = %candidate_id, "Could not record generation failure: {e}");
            }
        })
    }

    async fn run(&self, candidate_id: Uuid) -> Result<(), String> {
        let _worker = self
            .workers
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| "generation queue is closed".to_string())?;
        info!(candidate_id = %candidate_id, "Generation worker acquired");

        let generation = run_generation(self.store.as_ref(), self.llm.as_ref(), candidate_id);
        match tokio::time::timeout(self.timeout, generation).await {
            Ok(Ok(_exam)) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => self.settle_after_deadline(candidate_id).await,
        }
    }

    /// The deadline can fire between storing the exam and recording ExamReady.
    /// A stored exam is complete (writes are atomic), so the session is ready.
    async fn settle_after_deadline(&self, candidate_id: Uuid) -> Result<(), String> {
        let store = self.store.as_ref();
        let exam_stored = store
            .contains(candidate_id, &ArtifactKind::Exam)
            .await
            .map_err(|e| e.to_string())?;
        if !exam_stored {
            return Err(format!(
                "exam generation timed out after {:?}",
                self.timeout
            ));
        }

        warn!(candidate_id = %candidate_id, "Deadline hit after the exam was stored");
        save_status(store, candidate_id, &SessionStatus::new(SessionState::ExamReady))
            .await
            .map_err(|e| e.to_string())
    }
}
