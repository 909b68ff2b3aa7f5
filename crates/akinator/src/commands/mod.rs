//! CLI command handlers.

pub mod answer;
pub mod back;
pub mod cache;
pub mod play;
pub mod start;

use std::path::PathBuf;

use akinator_client::{Akinator, GameResponse, GameResult, Language};
use akinator_config::{AkinatorConfig, CacheSection, GameConfig};
use akinator_session::SessionCache;
use anyhow::{Result, anyhow};
use console::Style;
use tracing::{debug, warn};

/// Flags that take priority over config files.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub language: Option<String>,
    pub child_mode: bool,
    pub cache_path: Option<PathBuf>,
    pub json_output: bool,
    pub verbose: bool,
}

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Merged configuration, CLI flags applied.
    pub config: AkinatorConfig,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Discover config files and apply the command-line overrides.
    pub fn load(overrides: Overrides) -> Result<Self> {
        let loaded = akinator_config::load_config(None)?;
        for warning in &loaded.warnings {
            warn!("{}", warning);
        }
        for path in loaded.loaded_from() {
            debug!(path = %path.display(), "Loaded config");
        }

        let mut config = loaded.config;
        apply_overrides(&mut config, &overrides);

        // Reject a bad language before any command runs
        config.language().parse::<Language>()?;

        Ok(Self {
            config,
            json_output: overrides.json_output,
            verbose: overrides.verbose,
        })
    }

    /// Build a game for this context.
    pub fn game(&self) -> Result<Akinator> {
        if self.verbose {
            let dim = Style::new().dim();
            let cache = akinator_client::cache_config(&self.config);
            eprintln!(
                "{}",
                dim.apply_to(format!(
                    "Language: {}  Child mode: {}",
                    self.config.language(),
                    self.config.child_mode()
                ))
            );
            eprintln!(
                "{}",
                dim.apply_to(format!(
                    "Cache: {} (ttl {}s)",
                    cache.path.display(),
                    cache.ttl.as_secs()
                ))
            );
        }
        Ok(Akinator::from_config(&self.config)?)
    }

    /// Open the session cache this context points at.
    pub fn cache(&self) -> SessionCache {
        SessionCache::new(akinator_client::cache_config(&self.config))
    }

    /// Print a game response and turn a failure into an error exit.
    ///
    /// In text mode a failure is not printed here; the returned error is
    /// reported once by `main`.
    pub fn report(&self, response: &GameResponse) -> Result<()> {
        if self.json_output {
            println!("{}", serde_json::to_string_pretty(response)?);
        }

        match response.error() {
            Some(message) => Err(anyhow!(message.to_string())),
            None => {
                if !self.json_output {
                    print_result(&response.result);
                }
                Ok(())
            }
        }
    }
}

fn apply_overrides(config: &mut AkinatorConfig, overrides: &Overrides) {
    if let Some(language) = &overrides.language {
        config.game.get_or_insert_with(GameConfig::default).language = Some(language.clone());
    }
    if overrides.child_mode {
        config.game.get_or_insert_with(GameConfig::default).child_mode = true;
    }
    if let Some(path) = &overrides.cache_path {
        config.cache.get_or_insert_with(CacheSection::default).path = Some(path.clone());
    }
}

/// Human-readable rendering of a game result.
pub fn print_result(result: &GameResult) {
    let dim = Style::new().dim();
    let bold = Style::new().bold();

    match result {
        GameResult::Started { id, question } => {
            println!("{}", dim.apply_to(format!("Game {}", id)));
            println!("{}", bold.apply_to(question));
        }
        GameResult::Question {
            progress,
            step,
            question,
            ..
        } => {
            println!(
                "{}",
                dim.apply_to(format!("Question {} ({}%)", step + 1, progress))
            );
            println!("{}", bold.apply_to(question));
        }
        GameResult::Guess {
            name,
            description,
            photo,
            ..
        } => {
            println!("I think of {}", Style::new().bold().cyan().apply_to(name));
            if !description.is_empty() {
                println!("{}", description);
            }
            if !photo.is_empty() {
                println!("{}", dim.apply_to(photo));
            }
        }
        GameResult::Error { error } => {
            eprintln!("{} {}", Style::new().red().apply_to("Error:"), error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config() {
        let mut config = AkinatorConfig::from_toml(
            "[game]\nlanguage = \"fr\"\n\n[cache]\nttl_secs = 60\n",
        )
        .unwrap();

        apply_overrides(
            &mut config,
            &Overrides {
                language: Some("jp".to_string()),
                child_mode: true,
                cache_path: Some(PathBuf::from("/tmp/aki.json")),
                ..Default::default()
            },
        );

        assert_eq!(config.language(), "jp");
        assert!(config.child_mode());
        assert_eq!(config.cache_path(), Some(&PathBuf::from("/tmp/aki.json")));
        assert_eq!(config.cache_ttl().as_secs(), 60);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = AkinatorConfig::from_toml("[game]\nchild_mode = true\n").unwrap();
        apply_overrides(&mut config, &Overrides::default());
        assert!(config.child_mode());
        assert_eq!(config.language(), "en");
        assert!(config.cache.is_none());
    }
}
