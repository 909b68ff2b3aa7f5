//! Public types: languages, answers and the uniform operation response.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, ErrorKind, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Language
// ─────────────────────────────────────────────────────────────────────────────

/// Locales served by Akinator, each on its own subdomain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Arabic,
    Chinese,
    German,
    Spanish,
    French,
    Italian,
    Japanese,
    Korean,
    Dutch,
    Polish,
    Portuguese,
    Russian,
    Turkish,
    Indonesian,
}

impl Language {
    /// Every supported language.
    pub const ALL: [Language; 15] = [
        Language::English,
        Language::Arabic,
        Language::Chinese,
        Language::German,
        Language::Spanish,
        Language::French,
        Language::Italian,
        Language::Japanese,
        Language::Korean,
        Language::Dutch,
        Language::Polish,
        Language::Portuguese,
        Language::Russian,
        Language::Turkish,
        Language::Indonesian,
    ];

    /// Subdomain code used by the service.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
            Language::Chinese => "cn",
            Language::German => "de",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::Italian => "it",
            Language::Japanese => "jp",
            Language::Korean => "kr",
            Language::Dutch => "nl",
            Language::Polish => "pl",
            Language::Portuguese => "pt",
            Language::Russian => "ru",
            Language::Turkish => "tr",
            Language::Indonesian => "id",
        }
    }

    /// Default service root for this language.
    pub fn base_url(self) -> String {
        format!("https://{}.akinator.com/", self.code())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    /// Accepts the subdomain code (`"fr"`) or the English name (`"french"`).
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == wanted || format!("{:?}", lang).to_lowercase() == wanted)
            .ok_or_else(|| Error::UnsupportedLanguage(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Answer
// ─────────────────────────────────────────────────────────────────────────────

/// The five answers the service understands, with their wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Answer {
    Yes = 0,
    No = 1,
    IdontKnow = 2,
    Probably = 3,
    ProbablyNot = 4,
}

impl Answer {
    /// Numeric code sent in the `answer` form field.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Map a numeric code back to an answer.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Answer::Yes),
            1 => Some(Answer::No),
            2 => Some(Answer::IdontKnow),
            3 => Some(Answer::Probably),
            4 => Some(Answer::ProbablyNot),
            _ => None,
        }
    }

    /// Parse an alias, case-insensitively.
    ///
    /// Accepts the short and long aliases (`y`, `yes`, `idk`, `i don't know`,
    /// `pn`, `probably not`, ...), the variant names (`IdontKnow`) and the
    /// numeric codes written as text (`"0"` to `"4"`).
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "y" | "yes" => Some(Answer::Yes),
            "n" | "no" => Some(Answer::No),
            "idk" | "i don't know" | "idontknow" => Some(Answer::IdontKnow),
            "p" | "probably" => Some(Answer::Probably),
            "pn" | "probably not" | "probablynot" => Some(Answer::ProbablyNot),
            other => other.parse::<i64>().ok().and_then(Answer::from_code),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Answer::Yes => "Yes",
            Answer::No => "No",
            Answer::IdontKnow => "I don't know",
            Answer::Probably => "Probably",
            Answer::ProbablyNot => "Probably not",
        };
        f.write_str(text)
    }
}

impl FromStr for Answer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Answer::parse(s).ok_or_else(|| Error::InvalidAnswer(s.to_string()))
    }
}

/// Raw answer as supplied by a caller: a numeric code or an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerInput {
    Code(i64),
    Text(String),
}

impl AnswerInput {
    /// Resolve to one of the five answers.
    pub fn normalize(&self) -> Result<Answer> {
        match self {
            AnswerInput::Code(code) => {
                Answer::from_code(*code).ok_or_else(|| Error::InvalidAnswer(code.to_string()))
            }
            AnswerInput::Text(text) => text.parse(),
        }
    }
}

impl From<Answer> for AnswerInput {
    fn from(answer: Answer) -> Self {
        AnswerInput::Code(i64::from(answer.code()))
    }
}

impl From<u8> for AnswerInput {
    fn from(code: u8) -> Self {
        AnswerInput::Code(i64::from(code))
    }
}

impl From<i32> for AnswerInput {
    fn from(code: i32) -> Self {
        AnswerInput::Code(i64::from(code))
    }
}

impl From<i64> for AnswerInput {
    fn from(code: i64) -> Self {
        AnswerInput::Code(code)
    }
}

impl From<&str> for AnswerInput {
    fn from(text: &str) -> Self {
        AnswerInput::Text(text.to_string())
    }
}

impl From<String> for AnswerInput {
    fn from(text: String) -> Self {
        AnswerInput::Text(text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

/// Uniform result of every game operation: `{ "ok": bool, "result": ... }`.
///
/// Failures also carry the [`ErrorKind`] of the underlying error. It is not
/// part of the serialized shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResponse {
    /// Whether `result` holds a success payload.
    pub ok: bool,

    /// Success payload or `{ "error": message }`.
    pub result: GameResult,

    #[serde(skip)]
    kind: Option<ErrorKind>,
}

impl GameResponse {
    /// Wrap a success payload.
    pub fn success(result: GameResult) -> Self {
        Self {
            ok: true,
            result,
            kind: None,
        }
    }

    /// Wrap an error, keeping its message and kind.
    pub fn failure(error: &Error) -> Self {
        Self {
            ok: false,
            result: GameResult::Error {
                error: error.to_string(),
            },
            kind: Some(error.kind()),
        }
    }

    /// The error message, if this is a failure.
    pub fn error(&self) -> Option<&str> {
        match &self.result {
            GameResult::Error { error } => Some(error),
            _ => None,
        }
    }

    /// Kind of the error, if this is a failure.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.kind
    }
}

impl From<Result<GameResult>> for GameResponse {
    fn from(result: Result<GameResult>) -> Self {
        match result {
            Ok(payload) => GameResponse::success(payload),
            Err(e) => GameResponse::failure(&e),
        }
    }
}

/// Payload of a game operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GameResult {
    /// A game was started.
    Started { id: String, question: String },

    /// The service asked another question.
    Question {
        id: String,
        progress: String,
        step: u32,
        question: String,
    },

    /// The service made its final guess; the session is over.
    Guess {
        id: String,
        photo: String,
        description: String,
        name: String,
    },

    /// The operation failed.
    Error { error: String },
}

impl GameResult {
    /// Session id the payload refers to, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            GameResult::Started { id, .. }
            | GameResult::Question { id, .. }
            | GameResult::Guess { id, .. } => Some(id),
            GameResult::Error { .. } => None,
        }
    }

    /// Question text, for payloads that carry one.
    pub fn question(&self) -> Option<&str> {
        match self {
            GameResult::Started { question, .. } | GameResult::Question { question, .. } => {
                Some(question)
            }
            _ => None,
        }
    }
}
