//! Persisted session records and the cache document layout.
//!
//! On disk the document is a single JSON object:
//!
//! ```json
//! {
//!   "3f0c...": {
//!     "data": { "session": "123", "signature": "abc", "step": 4, "progress": "31.27" },
//!     "expiry": 1760000000000
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Progress value the remote service expects before the first answer.
pub const INITIAL_PROGRESS: &str = "0.00000";

/// State of one game in progress, echoed back to the remote service on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque session token issued by the remote service.
    pub session: String,

    /// Opaque signature issued alongside the session token.
    pub signature: String,

    /// Number of questions asked so far.
    pub step: u32,

    /// Remote-reported progress, kept as the decimal string the service sent.
    pub progress: String,
}

impl SessionRecord {
    /// Create the record for a freshly started game.
    pub fn new(session: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            signature: signature.into(),
            step: 0,
            progress: INITIAL_PROGRESS.to_string(),
        }
    }

    /// Copy of this record moved to a new step and progress.
    pub fn advanced(&self, step: u32, progress: impl Into<String>) -> Self {
        Self {
            step,
            progress: progress.into(),
            ..self.clone()
        }
    }
}

/// A record together with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The cached session state.
    pub data: SessionRecord,

    /// Expiry as milliseconds since the Unix epoch.
    pub expiry: i64,
}

impl CacheEntry {
    /// Create an entry expiring at `expiry` (epoch milliseconds).
    pub fn new(data: SessionRecord, expiry: i64) -> Self {
        Self { data, expiry }
    }

    /// An entry is live strictly before its expiry.
    pub fn is_live(&self, now_millis: i64) -> bool {
        now_millis < self.expiry
    }
}

/// Every cached session, keyed by session id. Written and read as a whole.
pub type CacheDocument = BTreeMap<String, CacheEntry>;
