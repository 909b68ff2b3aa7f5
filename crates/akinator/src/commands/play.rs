//! Interactive game loop.

use akinator_client::{Akinator, ErrorKind, GameResponse, GameResult};
use anyhow::Result;
use clap::Args;
use console::{Style, style};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use super::{Context, print_result};

/// Arguments for the play command.
#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Resume a cached game instead of starting a new one
    #[arg(short, long)]
    pub resume: Option<String>,
}

/// What the loop does after handling a line.
enum ControlFlow {
    Continue,
    Exit,
}

/// Run the play command.
pub async fn run(args: PlayArgs, ctx: &Context) -> Result<()> {
    let game = ctx.game()?;
    let config = Config::builder().auto_add_history(true).build();
    let mut editor: Editor<(), DefaultHistory> = Editor::with_config(config)?;

    print_welcome(ctx);

    let id = match args.resume {
        Some(id) => {
            println!("{}", Style::new().dim().apply_to(format!("Resuming {}", id)));
            id
        }
        None => {
            let response = game.start_game().await;
            match response.result.id() {
                Some(id) if response.ok => {
                    print_result(&response.result);
                    id.to_string()
                }
                _ => return ctx.report(&response),
            }
        }
    };

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match handle_line(&game, &id, line).await {
                    ControlFlow::Continue => continue,
                    ControlFlow::Exit => break,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!();
                print_dim("(Interrupted - type q to quit)");
            }
            Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => {
                eprintln!("{} {}", Style::new().red().apply_to("Input error:"), e);
                break;
            }
        }
    }

    print_dim("Goodbye!");
    Ok(())
}

async fn handle_line(game: &Akinator, id: &str, line: &str) -> ControlFlow {
    let response = match line.to_lowercase().as_str() {
        "q" | "quit" | "exit" => return ControlFlow::Exit,
        "h" | "help" | "?" => {
            print_help();
            return ControlFlow::Continue;
        }
        "b" | "back" => game.back(id).await,
        _ => game.answer_question(line, id).await,
    };

    print_result(&response.result);
    if response.error_kind() == Some(ErrorKind::InvalidInput) {
        print_dim("Type h for the accepted answers");
    }
    after_response(&response)
}

fn after_response(response: &GameResponse) -> ControlFlow {
    match (&response.result, response.error_kind()) {
        (GameResult::Guess { .. }, _) => ControlFlow::Exit,
        (_, Some(ErrorKind::SessionNotFound)) => ControlFlow::Exit,
        _ => ControlFlow::Continue,
    }
}

fn print_welcome(ctx: &Context) {
    let dim = Style::new().dim();
    println!();
    println!("{}", style("Akinator").bold().cyan());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!(
        "{}",
        dim.apply_to(format!(
            "Language: {}{}",
            ctx.config.language(),
            if ctx.config.child_mode() { " (child mode)" } else { "" }
        ))
    );
    println!(
        "{}",
        dim.apply_to("Think of a character. Answer y, n, idk, p or pn; h for help.")
    );
    println!();
}

fn print_help() {
    let dim = Style::new().dim();
    println!();
    println!("{}", style("Answers").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!("  {}  - Yes", style("y, yes, 0").cyan());
    println!("  {}  - No", style("n, no, 1").cyan());
    println!("  {}  - I don't know", style("idk, 2").cyan());
    println!("  {}  - Probably", style("p, probably, 3").cyan());
    println!("  {}  - Probably not", style("pn, probably not, 4").cyan());
    println!();
    println!("{}", style("Commands").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!("  {}  - Undo the last answer", style("b, back").cyan());
    println!("  {}  - Leave the game", style("q, quit").cyan());
    println!();
}

fn print_dim(msg: &str) {
    println!("{}", Style::new().dim().apply_to(msg));
}
