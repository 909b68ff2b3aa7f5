//! Answer command - answer the current question of a cached game.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the answer command.
#[derive(Args, Debug)]
pub struct AnswerArgs {
    /// Game id printed by `start`
    pub id: String,

    /// yes, no, idk, probably, "probably not" (or 0-4)
    pub answer: String,
}

/// Run the answer command.
pub async fn run(args: AnswerArgs, ctx: &Context) -> Result<()> {
    let game = ctx.game()?;
    let response = game.answer_question(args.answer, &args.id).await;
    ctx.report(&response)
}
