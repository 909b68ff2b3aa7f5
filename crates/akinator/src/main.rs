//! Akinator - the web genie, from the terminal
//!
//! Main entry point for the Akinator CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{answer, back, cache, play, start};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Akinator - think of a character and let the genie guess it
#[derive(Parser)]
#[command(name = "akinator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Game language code or name (en, fr, jp, "german", ...)
    #[arg(short, long, global = true, env = "AKINATOR_LANGUAGE")]
    pub language: Option<String>,

    /// Restrict the game to child-safe characters
    #[arg(long, global = true)]
    pub child_mode: bool,

    /// Path of the session cache document
    #[arg(long, global = true, env = "AKINATOR_CACHE_PATH")]
    pub cache_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play an interactive game
    Play(play::PlayArgs),

    /// Start a game and print its id and first question
    Start(start::StartArgs),

    /// Answer the current question of a game
    Answer(answer::AnswerArgs),

    /// Undo the last answer of a game
    Back(back::BackArgs),

    /// Session cache maintenance
    Cache(cache::CacheArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "akinator=debug,akinator_client=debug,akinator_session=debug,akinator_config=debug,info"
    } else {
        "akinator=info,akinator_client=warn,akinator_session=warn,error"
    };

    let log_dir = akinator_config::xdg_config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "akinator.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "akinator=trace,akinator_client=trace,akinator_session=trace,akinator_config=trace,info",
                )),
        )
        .init();

    let ctx = commands::Context::load(commands::Overrides {
        language: cli.language,
        child_mode: cli.child_mode,
        cache_path: cli.cache_path,
        json_output: cli.json,
        verbose: cli.verbose,
    })?;

    match cli.command {
        Commands::Play(args) => play::run(args, &ctx).await,
        Commands::Start(args) => start::run(args, &ctx).await,
        Commands::Answer(args) => answer::run(args, &ctx).await,
        Commands::Back(args) => back::run(args, &ctx).await,
        Commands::Cache(args) => cache::run(args, &ctx).await,
    }
}
