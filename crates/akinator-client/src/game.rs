//! Game orchestrator: drives the remote service and keeps the session cache in step.
//!
//! Per session id the lifecycle is `NEW → IN_PROGRESS → (RESOLVED | ABANDONED)`:
//! a successful [`Akinator::start_game`] writes the cache entry, answers and
//! [`Akinator::back`] refresh it, a final guess deletes it, and an abandoned
//! game simply expires.

use std::sync::Arc;

use akinator_config::AkinatorConfig;
use akinator_session::{CacheConfig, SessionCache, SessionRecord, SessionStore};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::{AnswerForm, AnswerOutcome, BeginForm, CancelForm, GameService};
use crate::client::AkinatorClient;
use crate::error::{Error, Result};
use crate::types::{AnswerInput, GameResponse, GameResult, Language};

/// Akinator game wrapper.
///
/// Every operation returns a [`GameResponse`]; failures of any kind are
/// reported through `ok: false` and never escape as errors or panics.
///
/// # Example
///
/// ```no_run
/// use akinator_client::{Akinator, Language};
///
/// # async fn example() -> akinator_client::Result<()> {
/// let aki = Akinator::new(Language::English, false)?;
///
/// let started = aki.start_game().await;
/// let id = started.result.id().unwrap_or_default().to_string();
///
/// let next = aki.answer_question("yes", &id).await;
/// if !next.ok {
///     eprintln!("{}", next.error().unwrap_or_default());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Akinator<G: GameService = AkinatorClient> {
    service: G,
    store: Arc<dyn SessionStore>,
    child_mode: bool,
}

impl Akinator<AkinatorClient> {
    /// Create a game for `language`, caching sessions in `<cwd>/cache/akinator.json`.
    pub fn new(language: Language, child_mode: bool) -> Result<Self> {
        let service = AkinatorClient::new(language)?;
        let store = Arc::new(SessionCache::new(CacheConfig::default()));
        Ok(Self::with_parts(service, store, child_mode))
    }

    /// Create a game from loaded configuration.
    pub fn from_config(config: &AkinatorConfig) -> Result<Self> {
        let language: Language = config.language().parse()?;

        let mut builder = AkinatorClient::builder()
            .language(language)
            .timeout(config.timeout());
        if let Some(agent) = config.user_agent() {
            builder = builder.user_agent(agent);
        }
        if let Some(url) = config.base_url() {
            builder = builder.base_url(url);
        }

        Ok(Self::with_parts(
            builder.build()?,
            Arc::new(SessionCache::new(cache_config(config))),
            config.child_mode(),
        ))
    }
}

/// Cache location and lifetime named by `config`.
pub fn cache_config(config: &AkinatorConfig) -> CacheConfig {
    let cache = CacheConfig::default().with_ttl(config.cache_ttl());
    match config.cache_path() {
        Some(path) => cache.with_path(path.clone()),
        None => cache,
    }
}

impl<G: GameService> Akinator<G> {
    /// Assemble a game from an explicit service and session store.
    pub fn with_parts(service: G, store: Arc<dyn SessionStore>, child_mode: bool) -> Self {
        Self {
            service,
            store,
            child_mode,
        }
    }

    /// Whether child mode is enabled.
    pub fn child_mode(&self) -> bool {
        self.child_mode
    }

    /// Start a new game under a freshly minted session id.
    ///
    /// Nothing is cached unless the service issued both a session token and
    /// a signature.
    pub async fn start_game(&self) -> GameResponse {
        self.respond("start", self.try_start_game().await)
    }

    /// Answer the current question of session `id`.
    ///
    /// `answer` may be a numeric code (`0`..=`4`) or an alias such as
    /// `"y"`, `"no"`, `"idk"`, `"probably not"`.
    pub async fn answer_question(&self, answer: impl Into<AnswerInput>, id: &str) -> GameResponse {
        let answer = answer.into();
        self.respond("answer", self.try_answer_question(&answer, id).await)
    }

    /// Undo the last answer of session `id`.
    pub async fn back(&self, id: &str) -> GameResponse {
        self.respond("back", self.try_back(id).await)
    }

    async fn try_start_game(&self) -> Result<GameResult> {
        let id = Uuid::new_v4().to_string();

        let page = self.service.begin(&BeginForm::new(self.child_mode)).await?;
        let (session, signature) = page.credentials().ok_or(Error::MissingCredentials)?;

        self.store
            .set(&id, SessionRecord::new(session, signature))
            .await;

        info!(id = %id, child_mode = self.child_mode, "Game started");
        Ok(GameResult::Started {
            id,
            question: page.question,
        })
    }

    async fn try_answer_question(&self, answer: &AnswerInput, id: &str) -> Result<GameResult> {
        let answer = answer.normalize()?;
        let record = self.lookup(id).await?;

        let response = self
            .service
            .answer(&AnswerForm::new(&record, answer, self.child_mode))
            .await?;

        match response.into_outcome()? {
            AnswerOutcome::Question(next) => {
                self.store
                    .set(id, record.advanced(next.step, next.progression.clone()))
                    .await;
                debug!(id = %id, answer = %answer, step = next.step, "Answer accepted");
                Ok(GameResult::Question {
                    id: id.to_string(),
                    progress: next.progression,
                    step: next.step,
                    question: next.question,
                })
            }
            AnswerOutcome::Guess(guess) => {
                self.store.delete(id).await;
                info!(id = %id, name = %guess.name, "Game resolved");
                Ok(GameResult::Guess {
                    id: id.to_string(),
                    photo: guess.photo,
                    description: guess.description,
                    name: guess.name,
                })
            }
        }
    }

    async fn try_back(&self, id: &str) -> Result<GameResult> {
        let record = self.lookup(id).await?;

        let previous = self
            .service
            .cancel(&CancelForm::new(&record, self.child_mode))
            .await?
            .into_step()?;

        self.store
            .set(id, record.advanced(previous.step, previous.progression.clone()))
            .await;
        debug!(id = %id, step = previous.step, "Stepped back");

        Ok(GameResult::Question {
            id: id.to_string(),
            progress: previous.progression,
            step: previous.step,
            question: previous.question,
        })
    }

    async fn lookup(&self, id: &str) -> Result<SessionRecord> {
        self.store
            .get(id)
            .await
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    fn respond(&self, operation: &str, result: Result<GameResult>) -> GameResponse {
        if let Err(e) = &result {
            if e.is_remote() {
                warn!(operation = operation, error = %e, "Akinator request failed");
            } else {
                debug!(operation = operation, error = %e, "Akinator operation rejected");
            }
        }
        GameResponse::from(result)
    }
}
