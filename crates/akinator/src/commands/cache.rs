//! Cache command - inspect and maintain the session cache.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use serde_json::json;

use super::Context;

/// Arguments for the cache command.
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: Option<CacheCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Show the cache location and entry counts (default)
    Status,

    /// Remove expired sessions
    Purge,

    /// Delete the cache document and every session in it
    Clear,
}

/// Run the cache command.
pub async fn run(args: CacheArgs, ctx: &Context) -> Result<()> {
    let cache = ctx.cache();
    let path = cache.store().path().display().to_string();
    let dim = Style::new().dim();

    match args.command.unwrap_or(CacheCommand::Status) {
        CacheCommand::Status => {
            let stats = cache.stats().await?;
            if ctx.json_output {
                let value = json!({
                    "path": path,
                    "live": stats.live,
                    "expired": stats.expired,
                    "ttl_secs": stats.ttl.as_secs(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", Style::new().bold().apply_to("Session cache"));
                println!("{}", dim.apply_to("─".repeat(40)));
                println!("  Path:     {}", path);
                println!("  Live:     {}", stats.live);
                println!("  Expired:  {}", stats.expired);
                println!("  TTL:      {}s", stats.ttl.as_secs());
            }
        }
        CacheCommand::Purge => {
            let removed = cache.purge_expired().await?;
            if ctx.json_output {
                println!("{}", json!({ "path": path, "removed": removed }));
            } else {
                println!("Removed {} expired session(s)", removed);
            }
        }
        CacheCommand::Clear => {
            cache.try_clear().await?;
            if ctx.json_output {
                println!("{}", json!({ "path": path, "cleared": true }));
            } else {
                println!("Cleared {}", path);
            }
        }
    }

    Ok(())
}
