//! Start command - begin a game and print its id.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the start command.
#[derive(Args, Debug)]
pub struct StartArgs {}

/// Run the start command.
pub async fn run(_args: StartArgs, ctx: &Context) -> Result<()> {
    let game = ctx.game()?;
    let response = game.start_game().await;
    ctx.report(&response)
}
