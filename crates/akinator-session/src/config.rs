//! Configuration for the session cache.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default lifetime of an unrefreshed session entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Directory, relative to the working directory, holding the default cache file.
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// File name of the default cache document.
pub const DEFAULT_CACHE_FILE: &str = "akinator.json";

/// Configuration for the session cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Path of the JSON document holding every session.
    pub path: PathBuf,

    /// Time-to-live applied on every write.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            path: cwd.join(DEFAULT_CACHE_DIR).join(DEFAULT_CACHE_FILE),
            ttl: DEFAULT_TTL,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the default cache file name inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(DEFAULT_CACHE_FILE),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set the path of the cache document.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the TTL for cached sessions.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_is_under_cache_dir() {
        let config = CacheConfig::default();
        assert!(config.path.ends_with("cache/akinator.json"));
        assert_eq!(config.ttl, Duration::from_secs(600));
    }

    #[test]
    fn test_in_dir() {
        let config = CacheConfig::in_dir("/tmp/aki").with_ttl(Duration::from_secs(5));
        assert_eq!(config.path, PathBuf::from("/tmp/aki/akinator.json"));
        assert_eq!(config.ttl, Duration::from_secs(5));
    }
}
