//! Session archive: every stored artifact except previous archives, zipped into `<stem>.zip`.

use std::io::{Cursor, Write};

use tracing::info;
use uuid::Uuid;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::AppError;
use crate::session::artifact::ArtifactKind;
use crate::session::store::SessionStore;

/// Builds the archive from the store listing and stores it as `ArtifactKind::Archive(stem)`.
/// Returns the archive's file name.
pub async fn build_archive(
    store: &dyn SessionStore,
    candidate_id: Uuid,
    stem: &str,
) -> Result<String, AppError> {
    let mut entries = Vec::new();
    for path in store.list(candidate_id).await? {
        if ArtifactKind::is_archive_path(&path) {
            continue;
        }
        let bytes = store.read_entry(candidate_id, &path).await?;
        entries.push((path, bytes));
    }

    let count = entries.len();
    let archive = tokio::task::spawn_blocking(move || zip_entries(entries))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Archive task failed: {e}")))??;

    let kind = ArtifactKind::Archive(stem.to_string());
    store.put(candidate_id, &kind, archive).await?;
    info!(candidate_id = %candidate_id, entries = count, "Archive written: {kind}");

    Ok(kind.relative_path())
}

fn zip_entries(entries: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>, AppError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for (path, bytes) in entries {
        zip.start_file(path.as_str(), options)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to add {path}: {e}")))?;
        zip.write_all(&bytes)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to write {path}: {e}")))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to finish archive: {e}")))?;
    Ok(cursor.into_inner())
}
