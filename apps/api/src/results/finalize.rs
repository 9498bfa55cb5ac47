//! Finalize: consolidate, grade, report, archive, then mark the session Finalized.

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::LanguageModel;
use crate::models::job::JobDescription;
use crate::results::archive::build_archive;
use crate::results::consolidate::load_consolidated;
use crate::results::report::{generate_report, Marks};
use crate::session::artifact::ArtifactKind;
use crate::session::status::{load_existing, save_status, SessionStatus};
use crate::session::store::{read_json, SessionStore};

#[derive(Debug, Clone)]
pub struct FinalizeOutcome {
    pub marks: Marks,
    /// Archive file name, e.g. `Ada_Lovelace.zip`.
    pub archive: String,
    /// Where the archive lives in the backing store.
    pub archive_location: String,
    pub candidate_name: String,
}

/// Re-running finalize regenerates the report and replaces the archive.
pub async fn finalize_result(
    store: &dyn SessionStore,
    llm: &dyn LanguageModel,
    candidate_id: Uuid,
) -> Result<FinalizeOutcome, AppError> {
    load_existing(store, candidate_id)
        .await?
        .require_exam(candidate_id)?;

    let consolidated = load_consolidated(store, candidate_id).await?;
    let job: JobDescription = read_json(store, candidate_id, &ArtifactKind::JobDescription).await?;

    let (report, marks) = generate_report(llm, &consolidated, &job.test_details).await?;
    store
        .put(candidate_id, &ArtifactKind::FinalReport, report.into_bytes())
        .await?;

    // Status goes first so the archived status.json reads FINALIZED.
    let candidate_name = consolidated.profile.file_stem();
    let archive_kind = ArtifactKind::Archive(candidate_name.clone());
    save_status(
        store,
        candidate_id,
        &SessionStatus::finalized(candidate_name.clone(), archive_kind.relative_path()),
    )
    .await?;

    let archive = build_archive(store, candidate_id, &candidate_name).await?;
    let archive_location = store.location(candidate_id, &archive_kind);

    info!(
        candidate_id = %candidate_id,
        obtained = marks.obtained,
        total = marks.total,
        "Session finalized"
    );

    Ok(FinalizeOutcome {
        marks,
        archive,
        archive_location,
        candidate_name,
    })
}
