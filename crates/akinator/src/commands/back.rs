//! Back command - undo the last answer of a cached game.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the back command.
#[derive(Args, Debug)]
pub struct BackArgs {
    /// Game id printed by `start`
    pub id: String,
}

/// Run the back command.
pub async fn run(args: BackArgs, ctx: &Context) -> Result<()> {
    let game = ctx.game()?;
    let response = game.back(&args.id).await;
    ctx.report(&response)
}
