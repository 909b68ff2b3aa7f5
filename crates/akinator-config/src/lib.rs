//! Configuration system for the Akinator client.
//!
//! Provides TOML-based configuration with:
//! - Game defaults (`[game]`: language, child mode)
//! - Session cache location and lifetime (`[cache]`)
//! - HTTP behaviour (`[http]`: timeout, user agent, base URL override)
//! - Config file layering (user config dir + project-local `akinator.toml`)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    load_config, load_config_file, load_config_with_options, xdg_config_dir, xdg_config_path,
    ConfigSource, LoadedConfig,
};
pub use error::{ConfigError, Result};
pub use types::*;
