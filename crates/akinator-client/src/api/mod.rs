//! Remote endpoints and their wire formats.
//!
//! The service exposes three form-encoded POST endpoints per language:
//! `game` (HTML page), `answer` and `cancel_answer` (JSON).

mod answer;
mod begin;
mod cancel;
mod lenient;

use async_trait::async_trait;

use crate::error::Result;

pub use answer::{AnswerForm, AnswerOutcome, AnswerResponse, Guess};
pub use begin::{BeginForm, BeginPage, parse_begin_page};
pub use cancel::{CancelForm, CancelResponse, QuestionStep};

/// Remote game service as seen by the orchestrator.
///
/// [`AkinatorClient`](crate::AkinatorClient) talks HTTP;
/// [`MockGameService`](crate::MockGameService) replays canned responses.
#[async_trait]
pub trait GameService: Send + Sync {
    /// Start a game and return the extracted begin page.
    async fn begin(&self, form: &BeginForm) -> Result<BeginPage>;

    /// Submit an answer for the current question.
    async fn answer(&self, form: &AnswerForm) -> Result<AnswerResponse>;

    /// Undo the last answer.
    async fn cancel(&self, form: &CancelForm) -> Result<CancelResponse>;
}

/// Endpoint paths, relative to the language root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Game,
    Answer,
    Back,
}

impl Endpoint {
    /// Path segment of the endpoint.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Game => "game",
            Endpoint::Answer => "answer",
            Endpoint::Back => "cancel_answer",
        }
    }
}

#[async_trait]
impl<G: GameService + ?Sized> GameService for std::sync::Arc<G> {
    async fn begin(&self, form: &BeginForm) -> Result<BeginPage> {
        (**self).begin(form).await
    }

    async fn answer(&self, form: &AnswerForm) -> Result<AnswerResponse> {
        (**self).answer(form).await
    }

    async fn cancel(&self, form: &CancelForm) -> Result<CancelResponse> {
        (**self).cancel(form).await
    }
}
