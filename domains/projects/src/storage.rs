//! File storage for original and translated documents
//!
//! Files live under `projects/{project_id}/{original|translated}/{filename}`.
//! The returned reference is that relative key; it is what the project row
//! stores and what downloads resolve.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use lingodesk_common::{Error, Result};
use regex::Regex;
use uuid::Uuid;

/// Longest filename kept after sanitizing
pub const MAX_FILENAME_LEN: usize = 255;

lazy_static::lazy_static! {
    /// Characters allowed in a stored filename
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]").unwrap();
}

/// A file received from a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Reject missing names, empty contents and files over `max_bytes`
    pub fn validate(&self, max_bytes: usize) -> Result<()> {
        if self.filename.trim().is_empty() {
            return Err(Error::Validation("A file name is required".to_string()));
        }
        if self.bytes.is_empty() {
            return Err(Error::Validation("The uploaded file is empty".to_string()));
        }
        if self.bytes.len() > max_bytes {
            return Err(Error::Validation(format!(
                "File is {} bytes; the limit is {} bytes",
                self.bytes.len(),
                max_bytes
            )));
        }
        Ok(())
    }
}

/// A stored file read back for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Which document of a project a file is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Original,
    Translated,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Original => "original",
            FileKind::Translated => "translated",
        }
    }
}

/// Reduce a client filename to a safe single path segment
pub fn sanitize_filename(raw: &str) -> Result<String> {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(last, "_");
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        return Err(Error::Validation(format!("Invalid file name: '{}'", raw)));
    }

    Ok(cleaned.chars().take(MAX_FILENAME_LEN).collect())
}

/// Storage key for a project document
pub fn file_key(project_id: Uuid, kind: FileKind, filename: &str) -> Result<String> {
    Ok(format!(
        "projects/{}/{}/{}",
        project_id,
        kind.as_str(),
        sanitize_filename(filename)?
    ))
}

/// Download name for a stored reference: its last segment
pub fn filename_of(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Blob storage port
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous content; returns the reference
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String>;

    async fn get(&self, reference: &str) -> Result<Vec<u8>>;
}

/// File store on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a reference under the root, refusing anything that escapes it
    fn resolve(&self, reference: &str) -> Result<PathBuf> {
        let relative = Path::new(reference);
        let safe = !reference.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(Error::StorageFailure(format!(
                "Refusing file reference '{}'",
                reference
            )));
        }
        Ok(self.root.join(relative))
    }
}

fn storage_error(reference: &str, err: std::io::Error) -> Error {
    if err.kind() == ErrorKind::NotFound {
        Error::NotFound(format!("File {} not found", reference))
    } else {
        Error::StorageFailure(format!("{}: {}", reference, err))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error(key, e))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| Error::StorageFailure(format!("{}: {}", key, e)))?;

        tracing::debug!(key = %key, size = bytes.len(), "File stored");
        Ok(key.to_string())
    }

    async fn get(&self, reference: &str) -> Result<Vec<u8>> {
        let path = self.resolve(reference)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| storage_error(reference, e))
    }
}

/// File store held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileStore {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), bytes.to_vec());
        Ok(key.to_string())
    }

    async fn get(&self, reference: &str) -> Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(reference)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("File {} not found", reference)))
    }
}
