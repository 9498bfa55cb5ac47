//! Session store: the only code that touches session bytes.
//!
//! `SessionStore` is the contract every backend honours: artifacts are addressed
//! by `(session id, ArtifactKind)` and never shared across sessions.
//! `FsSessionStore` is the local-filesystem backend: one directory per session,
//! writes staged in a temp file and renamed into place.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::session::artifact::ArtifactKind;

/// tempfile's default prefix; staged writes are invisible to `list`.
const STAGING_PREFIX: &str = ".tmp";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session {0} does not exist")]
    UnknownSession(Uuid),

    #[error("{artifact} not found for session {session}")]
    NotFound { session: Uuid, artifact: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("blocking task failed: {0}")]
    Blocking(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Allocates a fresh id and its backing namespace.
    async fn create_session(&self) -> Result<Uuid, StoreError>;

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Replaces the artifact wholesale. Readers see either the old or the new bytes.
    async fn put(&self, id: Uuid, kind: &ArtifactKind, bytes: Vec<u8>) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid, kind: &ArtifactKind) -> Result<Vec<u8>, StoreError>;

    async fn contains(&self, id: Uuid, kind: &ArtifactKind) -> Result<bool, StoreError>;

    /// Every stored artifact of the session as `/`-separated relative paths, sorted.
    async fn list(&self, id: Uuid) -> Result<Vec<String>, StoreError>;

    /// Reads an artifact by a relative path previously returned from `list`.
    async fn read_entry(&self, id: Uuid, relative_path: &str) -> Result<Vec<u8>, StoreError>;

    /// Human-readable location of an artifact (a filesystem path for local storage).
    fn location(&self, id: Uuid, kind: &ArtifactKind) -> String;
}

pub async fn write_json<T: Serialize + ?Sized + Sync>(
    store: &dyn SessionStore,
    id: Uuid,
    kind: &ArtifactKind,
    value: &T,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    store.put(id, kind, bytes).await
}

pub async fn read_json<T: DeserializeOwned>(
    store: &dyn SessionStore,
    id: Uuid,
    kind: &ArtifactKind,
) -> Result<T, StoreError> {
    let bytes = store.get(id, kind).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Local-filesystem backend.
pub struct FsSessionStore {
    root: PathBuf,
}

impl FsSessionStore {
    /// Opens (and creates if needed) the storage root.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn session_dir(&self, id: Uuid) -> PathBuf {
        self.root.join(id.to_string())
    }

    async fn existing_session_dir(&self, id: Uuid) -> Result<PathBuf, StoreError> {
        let dir = self.session_dir(id);
        if is_dir(&dir).await? {
            Ok(dir)
        } else {
            Err(StoreError::UnknownSession(id))
        }
    }

    async fn read_file(&self, id: Uuid, relative_path: &str) -> Result<Vec<u8>, StoreError> {
        let dir = self.existing_session_dir(id).await?;
        match tokio::fs::read(dir.join(relative_path)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound {
                session: id,
                artifact: relative_path.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SessionStore for FsSessionStore {
    async fn create_session(&self) -> Result<Uuid, StoreError> {
        loop {
            let id = Uuid::new_v4();
            // Non-recursive create: an existing directory means the id is taken.
            match tokio::fs::create_dir(self.session_dir(id)).await {
                Ok(()) => {
                    debug!(candidate_id = %id, "Session directory created");
                    return Ok(id);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    warn!(candidate_id = %id, "Session id collision, drawing a new id");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        is_dir(&self.session_dir(id)).await
    }

    async fn put(&self, id: Uuid, kind: &ArtifactKind, bytes: Vec<u8>) -> Result<(), StoreError> {
        let target = self.existing_session_dir(id).await?.join(kind.relative_path());
        tokio::task::spawn_blocking(move || write_atomically(&target, &bytes))
            .await
            .map_err(|e| StoreError::Blocking(e.to_string()))??;
        debug!(candidate_id = %id, artifact = %kind, "Artifact written");
        Ok(())
    }

    async fn get(&self, id: Uuid, kind: &ArtifactKind) -> Result<Vec<u8>, StoreError> {
        self.read_file(id, &kind.relative_path()).await
    }

    async fn contains(&self, id: Uuid, kind: &ArtifactKind) -> Result<bool, StoreError> {
        let dir = self.existing_session_dir(id).await?;
        match tokio::fs::metadata(dir.join(kind.relative_path())).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, id: Uuid) -> Result<Vec<String>, StoreError> {
        let dir = self.existing_session_dir(id).await?;
        tokio::task::spawn_blocking(move || list_files(&dir))
            .await
            .map_err(|e| StoreError::Blocking(e.to_string()))?
    }

    async fn read_entry(&self, id: Uuid, relative_path: &str) -> Result<Vec<u8>, StoreError> {
        let escapes = Path::new(relative_path)
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || relative_path.is_empty() {
            return Err(StoreError::NotFound {
                session: id,
                artifact: relative_path.to_string(),
            });
        }
        self.read_file(id, relative_path).await
    }

    fn location(&self, id: Uuid, kind: &ArtifactKind) -> String {
        self.session_dir(id)
            .join(kind.relative_path())
            .display()
            .to_string()
    }
}

async fn is_dir(path: &Path) -> Result<bool, StoreError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn write_atomically(target: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let parent = target
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    std::fs::create_dir_all(parent)?;
    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(target).map_err(|e| e.error)?;
    Ok(())
}

fn list_files(dir: &Path) -> Result<Vec<String>, StoreError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry.map_err(|e| {
            e.into_io_error()
                .map(StoreError::Io)
                .unwrap_or_else(|| StoreError::Blocking("directory walk loop".to_string()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry
            .file_name()
            .to_string_lossy()
            .starts_with(STAGING_PREFIX)
        {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        files.push(joined);
    }
    files.sort();
    Ok(files)
}
