//! Answer endpoint: submits an answer and returns the next question or a guess.

use akinator_session::SessionRecord;
use serde::{Deserialize, Serialize};

use super::cancel::QuestionStep;
use super::lenient;
use crate::error::{Error, Result};
use crate::types::Answer;

/// Form body of the answer request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerForm {
    pub step: u32,
    pub progression: String,
    /// Numeric answer code.
    pub answer: u8,
    pub session: String,
    pub signature: String,
    pub question_filter: &'static str,
    pub sid: &'static str,
    /// Child mode flag.
    pub cm: bool,
    pub step_last_proposition: &'static str,
}

impl AnswerForm {
    /// Build the request for `answer` from the cached session state.
    pub fn new(record: &SessionRecord, answer: Answer, child_mode: bool) -> Self {
        Self {
            step: record.step,
            progression: record.progress.clone(),
            answer: answer.code(),
            session: record.session.clone(),
            signature: record.signature.clone(),
            question_filter: "string",
            sid: "NaN",
            cm: child_mode,
            step_last_proposition: "",
        }
    }
}

/// Raw JSON body of the answer response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnswerResponse {
    /// Set once the service is ready to guess.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub valide_contrainte: bool,

    #[serde(default, deserialize_with = "lenient::opt_step")]
    pub step: Option<u32>,

    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    pub progression: Option<String>,

    #[serde(default)]
    pub question: Option<String>,

    #[serde(default)]
    pub photo: Option<String>,

    #[serde(default)]
    pub description_proposition: Option<String>,

    #[serde(default)]
    pub name_proposition: Option<String>,
}

impl AnswerResponse {
    /// Response asking another question.
    pub fn question(step: u32, progression: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            valide_contrainte: false,
            step: Some(step),
            progression: Some(progression.into()),
            question: Some(question.into()),
            ..Default::default()
        }
    }

    /// Response carrying the final guess.
    pub fn guess(
        name: impl Into<String>,
        description: impl Into<String>,
        photo: impl Into<String>,
    ) -> Self {
        Self {
            valide_contrainte: true,
            name_proposition: Some(name.into()),
            description_proposition: Some(description.into()),
            photo: Some(photo.into()),
            ..Default::default()
        }
    }

    /// Interpret the response, rejecting bodies missing the fields their branch needs.
    pub fn into_outcome(self) -> Result<AnswerOutcome> {
        if self.valide_contrainte {
            let name = self.name_proposition.ok_or_else(|| {
                Error::MalformedResponse("guess without name_proposition".to_string())
            })?;
            return Ok(AnswerOutcome::Guess(Guess {
                name,
                description: self.description_proposition.unwrap_or_default(),
                photo: self.photo.unwrap_or_default(),
            }));
        }

        Ok(AnswerOutcome::Question(QuestionStep::from_parts(
            self.step,
            self.progression,
            self.question,
        )?))
    }
}

/// What an answer led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Another question; the game continues.
    Question(QuestionStep),
    /// The final guess; the game is over.
    Guess(Guess),
}

/// The character the service settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guess {
    pub name: String,
    pub description: String,
    /// URL of the character's picture.
    pub photo: String,
}
