//! Storage backends for the cache document.
//!
//! The cache never touches the filesystem directly: it reads and writes the
//! whole [`CacheDocument`] through a [`DocumentStore`]. [`JsonFileStore`] is
//! the durable backend; [`MemoryStore`] keeps the document in process.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::record::CacheDocument;

/// Trait for cache document backends.
///
/// Implementations load and save the full document. They must not panic on
/// storage failures; errors are returned to the cache, which decides how to
/// degrade.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load the document. A store that holds nothing yields an empty document.
    async fn load(&self) -> Result<CacheDocument>;

    /// Replace the stored document.
    async fn save(&self, doc: &CacheDocument) -> Result<()>;

    /// Remove the stored document entirely. Removing nothing is not an error.
    async fn remove(&self) -> Result<()>;
}

/// Counter making temp file names unique within the process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Cache document stored as pretty-printed JSON in a single file.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// reader sees either the old or the new document, never a partial one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the document at `path`. Nothing is touched on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory of the document if needed. Idempotent.
    pub async fn ensure_storage_ready(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(parent, e))?;
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = self
            .path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cache".to_string());
        self.path
            .with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), n))
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> Result<CacheDocument> {
        self.ensure_storage_ready().await?;

        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!(path = %self.path.display(), "Cache file absent, using empty document");
                return Ok(CacheDocument::new());
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        if contents.trim().is_empty() {
            return Ok(CacheDocument::new());
        }

        serde_json::from_str(&contents).map_err(|source| Error::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }

    async fn save(&self, doc: &CacheDocument) -> Result<()> {
        self.ensure_storage_ready().await?;

        let bytes = serde_json::to_vec_pretty(doc).map_err(Error::Serialize)?;
        let tmp = self.temp_path();

        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| Error::io(&tmp, e))?;

        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(Error::io(&self.path, e));
        }

        debug!(
            path = %self.path.display(),
            entries = doc.len(),
            "Cache document saved"
        );
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }
}

/// In-process document store.
///
/// Useful for tests and for callers that do not need sessions to outlive the
/// process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: Mutex<CacheDocument>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored document.
    pub async fn snapshot(&self) -> CacheDocument {
        self.doc.lock().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self) -> Result<CacheDocument> {
        Ok(self.doc.lock().await.clone())
    }

    async fn save(&self, doc: &CacheDocument) -> Result<()> {
        *self.doc.lock().await = doc.clone();
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        self.doc.lock().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CacheEntry, SessionRecord};

    fn sample_doc() -> CacheDocument {
        let mut doc = CacheDocument::new();
        doc.insert(
            "game-1".to_string(),
            CacheEntry::new(SessionRecord::new("s1", "sig1"), 1_000),
        );
        doc
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cache").join("akinator.json"));

        let doc = store.load().await.unwrap();
        assert!(doc.is_empty());
        // Loading prepared the directory
        assert!(dir.path().join("cache").is_dir());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/deeper/akinator.json"));

        store.save(&sample_doc()).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, sample_doc());
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("akinator.json"));

        store.save(&sample_doc()).await.unwrap();
        store.save(&CacheDocument::new()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["akinator.json".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("akinator.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        let err = store.load().await.unwrap_err();
        assert!(err.is_corrupt());
    }

    #[tokio::test]
    async fn test_blank_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("akinator.json");
        std::fs::write(&path, "  \n").unwrap();

        let doc = JsonFileStore::new(&path).load().await.unwrap();
        assert!(doc.is_empty());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("akinator.json");
        let store = JsonFileStore::new(&path);

        store.save(&sample_doc()).await.unwrap();
        store.remove().await.unwrap();
        assert!(!path.exists());
        store.remove().await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.save(&sample_doc()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), sample_doc());

        store.remove().await.unwrap();
        assert!(store.snapshot().await.is_empty());
    }
}
