//! Session cache for in-flight Akinator games.
//!
//! This crate keeps the remote session token, signature, step and progress
//! of each game between calls:
//! - A single JSON document on disk holds every session, keyed by id
//! - Entries carry an absolute expiry and are treated as absent once it passes
//! - Storage failures are logged and degrade to "no effect" instead of failing the caller
//!
//! # Example
//!
//! ```rust,ignore
//! use akinator_session::{CacheConfig, SessionCache, SessionRecord, SessionStore};
//!
//! let cache = SessionCache::new(CacheConfig::default().with_ttl(Duration::from_secs(600)));
//! cache.set("game-1", SessionRecord::new("123", "abc")).await;
//! let record = cache.get("game-1").await;
//! ```

mod cache;
mod config;
mod error;
mod persistence;
mod record;
mod ttl;

pub use cache::{CacheStats, SessionCache, SessionStore};
pub use config::{CacheConfig, DEFAULT_CACHE_DIR, DEFAULT_CACHE_FILE, DEFAULT_TTL};
pub use error::{Error, Result};
pub use persistence::{DocumentStore, JsonFileStore, MemoryStore};
pub use record::{CacheDocument, CacheEntry, INITIAL_PROGRESS, SessionRecord};
pub use ttl::{Clock, ExpiryPolicy, ManualClock, SystemClock};
