//! Expiring session cache over a document store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::config::CacheConfig;
use crate::error::Result;
use crate::persistence::{DocumentStore, JsonFileStore};
use crate::record::{CacheDocument, CacheEntry, SessionRecord};
use crate::ttl::{Clock, ExpiryPolicy};

/// Key-value contract the game orchestrator relies on.
///
/// Operations never fail from the caller's point of view: a storage problem
/// is logged by the implementation and the operation has no effect.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get a live record, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Option<SessionRecord>;

    /// Insert or replace a record, refreshing its expiry.
    async fn set(&self, key: &str, record: SessionRecord);

    /// Remove a record. Removing an absent key is a no-op.
    async fn delete(&self, key: &str);

    /// Drop every record.
    async fn clear(&self);
}

/// Inner state shared between clones.
struct CacheInner<S> {
    /// Backend holding the document.
    store: S,

    /// Expiry computation and clock.
    policy: ExpiryPolicy,

    /// Serializes load-modify-save cycles.
    write_lock: Mutex<()>,
}

/// Session cache with TTL expiry.
///
/// Every mutation loads the whole document, changes one key and saves the
/// whole document back. Mutations made through one cache (and its clones) are
/// serialized, so concurrent writes to different keys never lose each other.
/// Separate processes sharing a file are not coordinated beyond atomic
/// replacement of the file.
pub struct SessionCache<S: DocumentStore = JsonFileStore> {
    inner: Arc<CacheInner<S>>,
}

impl SessionCache<JsonFileStore> {
    /// Create a cache backed by the JSON file named in `config`.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_store(JsonFileStore::new(config.path), config.ttl)
    }
}

impl<S: DocumentStore> SessionCache<S> {
    /// Create a cache over an arbitrary store, using the system clock.
    pub fn with_store(store: S, ttl: Duration) -> Self {
        Self::with_policy(store, ExpiryPolicy::new(ttl))
    }

    /// Create a cache over an arbitrary store with an explicit clock.
    pub fn with_clock(store: S, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self::with_policy(store, ExpiryPolicy::with_clock(ttl, clock))
    }

    fn with_policy(store: S, policy: ExpiryPolicy) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                store,
                policy,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Get the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.inner.policy.ttl()
    }

    /// Get a live record, surfacing storage errors.
    pub async fn try_get(&self, key: &str) -> Result<Option<SessionRecord>> {
        let doc = self.inner.store.load().await?;
        let now = self.inner.policy.now();

        match doc.get(key) {
            Some(entry) if entry.is_live(now) => {
                trace!(key = %key, "Session found in cache");
                Ok(Some(entry.data.clone()))
            }
            Some(_) => {
                debug!(key = %key, "Session expired");
                Ok(None)
            }
            None => {
                trace!(key = %key, "Session not in cache");
                Ok(None)
            }
        }
    }

    /// Insert or replace a record, surfacing storage errors.
    ///
    /// A failed load is retried once. A document that is still corrupt is
    /// replaced with an empty one; other storage errors abort the write.
    pub async fn try_set(&self, key: &str, record: SessionRecord) -> Result<()> {
        let _guard = self.inner.write_lock.lock().await;

        let mut doc = self.load_for_write().await?;
        let expiry = self.inner.policy.expiry_from_now();
        doc.insert(key.to_string(), CacheEntry::new(record, expiry));
        self.inner.store.save(&doc).await?;

        debug!(key = %key, expiry = expiry, entries = doc.len(), "Session written to cache");
        Ok(())
    }

    /// Remove a record, surfacing storage errors.
    ///
    /// Returns whether a record was present. The document is only rewritten
    /// when something was removed.
    pub async fn try_delete(&self, key: &str) -> Result<bool> {
        let _guard = self.inner.write_lock.lock().await;

        let mut doc = self.inner.store.load().await?;
        if doc.remove(key).is_none() {
            trace!(key = %key, "Delete of absent session ignored");
            return Ok(false);
        }
        self.inner.store.save(&doc).await?;

        debug!(key = %key, entries = doc.len(), "Session removed from cache");
        Ok(true)
    }

    /// Remove the backing document, surfacing storage errors.
    pub async fn try_clear(&self) -> Result<()> {
        let _guard = self.inner.write_lock.lock().await;
        self.inner.store.remove().await?;
        debug!("Session cache cleared");
        Ok(())
    }

    /// Remove every expired entry and return how many were dropped.
    ///
    /// Expired entries are already invisible to readers; this only reclaims
    /// space in the document.
    pub async fn purge_expired(&self) -> Result<usize> {
        let _guard = self.inner.write_lock.lock().await;

        let mut doc = self.inner.store.load().await?;
        let now = self.inner.policy.now();
        let before = doc.len();
        doc.retain(|_, entry| entry.is_live(now));
        let purged = before - doc.len();

        if purged > 0 {
            self.inner.store.save(&doc).await?;
            debug!(count = purged, "Purged expired sessions");
        }

        Ok(purged)
    }

    /// Count live and expired entries.
    pub async fn stats(&self) -> Result<CacheStats> {
        let doc = self.inner.store.load().await?;
        let now = self.inner.policy.now();
        let live = doc.values().filter(|e| e.is_live(now)).count();

        Ok(CacheStats {
            live,
            expired: doc.len() - live,
            ttl: self.ttl(),
        })
    }

    /// Load the document for a mutation, retrying once.
    ///
    /// Only a corrupt document is replaced with an empty one; any other
    /// failure is returned so the write has no effect.
    async fn load_for_write(&self) -> Result<CacheDocument> {
        let first = match self.inner.store.load().await {
            Ok(doc) => return Ok(doc),
            Err(e) => e,
        };
        warn!(error = %first, "Failed to load session cache, retrying once");

        match self.inner.store.load().await {
            Ok(doc) => Ok(doc),
            Err(e) if e.is_corrupt() => {
                warn!(error = %e, "Session cache corrupt, starting from an empty document");
                Ok(CacheDocument::new())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<S: DocumentStore> SessionStore for SessionCache<S> {
    async fn get(&self, key: &str) -> Option<SessionRecord> {
        match self.try_get(key).await {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %key, error = %e, "Error getting cache item");
                None
            }
        }
    }

    async fn set(&self, key: &str, record: SessionRecord) {
        if let Err(e) = self.try_set(key, record).await {
            warn!(key = %key, error = %e, "Error setting cache item");
        }
    }

    async fn delete(&self, key: &str) {
        if let Err(e) = self.try_delete(key).await {
            warn!(key = %key, error = %e, "Error deleting cache item");
        }
    }

    async fn clear(&self) {
        if let Err(e) = self.try_clear().await {
            warn!(error = %e, "Error clearing cache");
        }
    }
}

impl<S: DocumentStore> Clone for SessionCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries that can still be read.
    pub live: usize,

    /// Entries past their expiry but still in the document.
    pub expired: usize,

    /// TTL applied on write.
    pub ttl: Duration,
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::Error;
    use crate::persistence::MemoryStore;
    use crate::ttl::ManualClock;

    const TTL: Duration = Duration::from_secs(600);

    fn memory_cache() -> (SessionCache<MemoryStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let cache = SessionCache::with_clock(MemoryStore::new(), TTL, clock.clone());
        (cache, clock)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (cache, _) = memory_cache();
        let record = SessionRecord::new("s1", "sig1");

        cache.set("game-1", record.clone()).await;
        assert_eq!(cache.get("game-1").await, Some(record));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let (cache, _) = memory_cache();
        assert_eq!(cache.get("nonexistent").await, None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let (cache, clock) = memory_cache();
        cache.set("game-1", SessionRecord::new("s1", "sig1")).await;

        clock.advance(TTL - Duration::from_millis(1));
        assert!(cache.get("game-1").await.is_some());

        clock.advance(Duration::from_millis(2));
        assert!(cache.get("game-1").await.is_none());
    }

    #[tokio::test]
    async fn test_expiry_boundary_is_exclusive() {
        let (cache, clock) = memory_cache();
        cache.set("game-1", SessionRecord::new("s1", "sig1")).await;

        clock.advance(TTL);
        assert!(cache.get("game-1").await.is_none());
    }

    #[tokio::test]
    async fn test_write_refreshes_expiry() {
        let (cache, clock) = memory_cache();
        let record = SessionRecord::new("s1", "sig1");
        cache.set("game-1", record.clone()).await;

        clock.advance(Duration::from_secs(400));
        cache.set("game-1", record.advanced(1, "3.5")).await;

        clock.advance(Duration::from_secs(400));
        let got = cache.get("game-1").await.unwrap();
        assert_eq!(got.step, 1);
        assert_eq!(got.progress, "3.5");

        let doc = cache.store().snapshot().await;
        assert_eq!(doc["game-1"].expiry, 1_000_000 + 400_000 + 600_000);
    }

    #[tokio::test]
    async fn test_set_overwrites_expired_entry() {
        let (cache, clock) = memory_cache();
        cache.set("game-1", SessionRecord::new("old", "old")).await;
        clock.advance(TTL * 2);

        cache.set("game-1", SessionRecord::new("new", "new")).await;
        assert_eq!(cache.get("game-1").await.unwrap().session, "new");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (cache, _) = memory_cache();
        cache.set("game-1", SessionRecord::new("s1", "sig1")).await;
        cache.set("game-2", SessionRecord::new("s2", "sig2")).await;

        assert!(cache.try_delete("game-1").await.unwrap());
        let once = cache.store().snapshot().await;

        assert!(!cache.try_delete("game-1").await.unwrap());
        let twice = cache.store().snapshot().await;

        assert_eq!(once, twice);
        assert!(cache.get("game-1").await.is_none());
        assert!(cache.get("game-2").await.is_some());
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let (cache, _) = memory_cache();
        cache.set("game-1", SessionRecord::new("s1", "sig1")).await;
        cache.set("game-2", SessionRecord::new("s2", "sig2")).await;

        cache.clear().await;
        assert!(cache.get("game-1").await.is_none());
        assert!(cache.get("game-2").await.is_none());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (cache, clock) = memory_cache();
        cache.set("old", SessionRecord::new("s1", "sig1")).await;
        clock.advance(Duration::from_secs(500));
        cache.set("fresh", SessionRecord::new("s2", "sig2")).await;
        clock.advance(Duration::from_secs(200));

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.live, 1);
        assert_eq!(stats.expired, 1);

        assert_eq!(cache.purge_expired().await.unwrap(), 1);
        assert_eq!(cache.purge_expired().await.unwrap(), 0);

        let doc = cache.store().snapshot().await;
        assert!(doc.contains_key("fresh"));
        assert!(!doc.contains_key("old"));
    }

    #[tokio::test]
    async fn test_concurrent_writes_to_different_keys() {
        let (cache, _) = memory_cache();

        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let key = format!("game-{}", i);
                cache.set(&key, SessionRecord::new(format!("s{}", i), "sig")).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.store().snapshot().await.len(), 16);
    }

    /// Store whose first `failures` loads fail, as corrupt or as I/O errors.
    struct FlakyStore {
        inner: MemoryStore,
        failures: AtomicUsize,
        loads: AtomicUsize,
        io_errors: bool,
    }

    impl FlakyStore {
        fn new(failures: usize) -> Self {
            Self {
                inner: MemoryStore::new(),
                failures: AtomicUsize::new(failures),
                loads: AtomicUsize::new(0),
                io_errors: false,
            }
        }

        fn unreadable(failures: usize) -> Self {
            Self {
                io_errors: true,
                ..Self::new(failures)
            }
        }
    }

    #[async_trait]
    impl DocumentStore for FlakyStore {
        async fn load(&self) -> Result<CacheDocument> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                if self.io_errors {
                    return Err(Error::Io {
                        path: "flaky".to_string(),
                        source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                    });
                }
                let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
                return Err(Error::Corrupt {
                    path: "flaky".to_string(),
                    source,
                });
            }
            self.inner.load().await
        }

        async fn save(&self, doc: &CacheDocument) -> Result<()> {
            self.inner.save(doc).await
        }

        async fn remove(&self) -> Result<()> {
            self.inner.remove().await
        }
    }

    #[tokio::test]
    async fn test_set_retries_load_once() {
        let mut existing = CacheDocument::new();
        existing.insert(
            "existing".to_string(),
            CacheEntry::new(SessionRecord::new("e", "e"), i64::MAX),
        );
        let store = FlakyStore::new(1);
        store.inner.save(&existing).await.unwrap();
        let cache = SessionCache::with_store(store, TTL);

        cache.try_set("game-1", SessionRecord::new("s1", "sig1")).await.unwrap();

        assert_eq!(cache.store().loads.load(Ordering::SeqCst), 2);
        let doc = cache.store().inner.snapshot().await;
        // The retry succeeded, so the existing entry survived
        assert!(doc.contains_key("existing"));
        assert!(doc.contains_key("game-1"));
    }

    #[tokio::test]
    async fn test_set_starts_empty_after_second_failure() {
        let cache = SessionCache::with_store(FlakyStore::new(5), TTL);

        cache.try_set("game-1", SessionRecord::new("s1", "sig1")).await.unwrap();

        assert_eq!(cache.store().loads.load(Ordering::SeqCst), 2);
        let doc = cache.store().inner.snapshot().await;
        assert_eq!(doc.len(), 1);
        assert!(doc.contains_key("game-1"));
    }

    #[tokio::test]
    async fn test_set_keeps_document_when_unreadable() {
        let mut existing = CacheDocument::new();
        existing.insert(
            "other-game".to_string(),
            CacheEntry::new(SessionRecord::new("o", "o"), i64::MAX),
        );
        let store = FlakyStore::unreadable(2);
        store.inner.save(&existing).await.unwrap();
        let cache = SessionCache::with_store(store, TTL);

        let err = cache
            .try_set("game-1", SessionRecord::new("s1", "sig1"))
            .await
            .unwrap_err();
        assert!(!err.is_corrupt());
        assert_eq!(cache.store().loads.load(Ordering::SeqCst), 2);

        // The degrading variant has no effect either
        let store = FlakyStore::unreadable(2);
        store.inner.save(&existing).await.unwrap();
        let cache = SessionCache::with_store(store, TTL);
        cache.set("game-1", SessionRecord::new("s1", "sig1")).await;

        let doc = cache.store().inner.snapshot().await;
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["other-game"]);
    }

    #[tokio::test]
    async fn test_get_degrades_on_storage_error() {
        let cache = SessionCache::with_store(FlakyStore::new(1), TTL);
        assert!(cache.try_get("game-1").await.is_err());

        let cache = SessionCache::with_store(FlakyStore::new(1), TTL);
        assert_eq!(cache.get("game-1").await, None);
    }

    #[tokio::test]
    async fn test_file_backed_corrupt_document_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("akinator.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "garbage").unwrap();

        let cache = SessionCache::new(CacheConfig::new().with_path(&path));
        assert_eq!(cache.get("game-1").await, None);

        cache.set("game-1", SessionRecord::new("s1", "sig1")).await;
        assert_eq!(cache.get("game-1").await.unwrap().session, "s1");

        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["game-1"]["data"]["signature"], "sig1");
    }

    #[tokio::test]
    async fn test_file_backed_caches_share_document() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::in_dir(dir.path());

        let writer = SessionCache::new(config.clone());
        let reader = SessionCache::new(config);

        writer.set("game-1", SessionRecord::new("s1", "sig1")).await;
        assert!(reader.get("game-1").await.is_some());

        reader.delete("game-1").await;
        assert!(writer.get("game-1").await.is_none());
    }
}
