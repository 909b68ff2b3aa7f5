//! Error types for session cache operations.

/// Error type for session cache operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The cache file or its directory could not be read or written.
    #[error("failed to access cache file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The cache file exists but does not hold a valid cache document.
    #[error("cache file '{path}' is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The cache document could not be serialized.
    #[error("failed to serialize cache document: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl Error {
    /// Check if this error came from an unparseable document.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Error::Corrupt { .. })
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type for session cache operations.
pub type Result<T> = std::result::Result<T, Error>;
