//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [game]
//! language = "fr"
//! child_mode = true
//!
//! [cache]
//! path = "/var/lib/akinator/sessions.json"
//! ttl_secs = 600
//!
//! [http]
//! timeout_secs = 30
//! user_agent = "Mozilla/5.0 ..."
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Default language code.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default session lifetime in seconds.
pub const DEFAULT_TTL_SECS: u64 = 600;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AkinatorConfig {
    /// Game defaults.
    pub game: Option<GameConfig>,

    /// Session cache settings.
    pub cache: Option<CacheSection>,

    /// HTTP client settings.
    pub http: Option<HttpConfig>,
}

impl AkinatorConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> crate::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: AkinatorConfig) {
        if other.game.is_some() {
            self.game = other.game;
        }

        if other.cache.is_some() {
            self.cache = other.cache;
        }

        if other.http.is_some() {
            self.http = other.http;
        }
    }

    /// Configured language code, or `"en"`.
    pub fn language(&self) -> &str {
        self.game
            .as_ref()
            .and_then(|g| g.language.as_deref())
            .unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Whether child mode is enabled.
    pub fn child_mode(&self) -> bool {
        self.game.as_ref().is_some_and(|g| g.child_mode)
    }

    /// Configured cache document path, if any.
    ///
    /// `None` means the default `<cwd>/cache/akinator.json`.
    pub fn cache_path(&self) -> Option<&PathBuf> {
        self.cache.as_ref().and_then(|c| c.path.as_ref())
    }

    /// Session lifetime.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(
            self.cache
                .as_ref()
                .map(|c| c.ttl_secs)
                .unwrap_or(DEFAULT_TTL_SECS),
        )
    }

    /// HTTP request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.http
                .as_ref()
                .map(|h| h.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Custom user agent, if configured.
    pub fn user_agent(&self) -> Option<&str> {
        self.http.as_ref().and_then(|h| h.user_agent.as_deref())
    }

    /// Base URL override, if configured.
    pub fn base_url(&self) -> Option<&str> {
        self.http.as_ref().and_then(|h| h.base_url.as_deref())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// Game defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Language code (`en`, `fr`, `jp`, ...).
    pub language: Option<String>,

    /// Restrict the game to child-safe characters.
    pub child_mode: bool,
}

/// Session cache settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Path of the JSON cache document.
    pub path: Option<PathBuf>,

    /// Lifetime of an unrefreshed session, in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            path: None,
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// User agent sent with every request.
    pub user_agent: Option<String>,

    /// Replace `https://{lang}.akinator.com/` (mainly for testing).
    pub base_url: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            base_url: None,
        }
    }
}
