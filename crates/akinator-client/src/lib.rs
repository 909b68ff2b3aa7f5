//! Client for the Akinator guessing game.
//!
//! This crate wraps the three remote operations of an Akinator game (begin,
//! answer, step back) and keeps per-game state in an expiring session cache
//! so a game can be continued across calls and processes.
//!
//! # Example
//!
//! ```no_run
//! use akinator_client::{Akinator, GameResult, Language};
//!
//! # async fn example() -> akinator_client::Result<()> {
//! let aki = Akinator::new(Language::French, false)?;
//!
//! let response = aki.start_game().await;
//! let Some(id) = response.result.id().map(str::to_string) else {
//!     return Ok(());
//! };
//!
//! match aki.answer_question("probably", &id).await.result {
//!     GameResult::Question { question, step, .. } => println!("#{step}: {question}"),
//!     GameResult::Guess { name, .. } => println!("It's {name}!"),
//!     _ => {}
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Layers
//!
//! - [`AkinatorClient`]: reqwest-based [`GameService`] talking to `https://{lang}.akinator.com/`
//! - [`Akinator`]: orchestrator that reads and writes the session cache around each call
//! - [`MockGameService`]: scripted service for tests

pub mod api;
pub mod client;
pub mod error;
pub mod game;
pub mod mock;
pub mod types;

pub use api::{
    AnswerForm, AnswerOutcome, AnswerResponse, BeginForm, BeginPage, CancelForm, CancelResponse,
    Endpoint, GameService, Guess, QuestionStep, parse_begin_page,
};
pub use client::{AkinatorClient, BROWSER_USER_AGENT, ClientBuilder, DEFAULT_TIMEOUT};
pub use error::{Error, ErrorKind, Result};
pub use game::{Akinator, cache_config};
pub use mock::{MockGameService, MockRequest};
pub use types::*;
