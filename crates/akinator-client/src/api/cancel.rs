//! Cancel endpoint: steps back to the previous question.

use akinator_session::SessionRecord;
use serde::{Deserialize, Serialize};

use super::lenient;
use crate::error::{Error, Result};

/// Form body of the cancel request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelForm {
    pub step: u32,
    pub progression: String,
    pub session: String,
    pub signature: String,
    /// Child mode flag.
    pub cm: bool,
}

impl CancelForm {
    pub fn new(record: &SessionRecord, child_mode: bool) -> Self {
        Self {
            step: record.step,
            progression: record.progress.clone(),
            session: record.session.clone(),
            signature: record.signature.clone(),
            cm: child_mode,
        }
    }
}

/// Raw JSON body of the cancel response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CancelResponse {
    #[serde(default, deserialize_with = "lenient::opt_step")]
    pub step: Option<u32>,

    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    pub progression: Option<String>,

    #[serde(default)]
    pub question: Option<String>,
}

impl CancelResponse {
    pub fn new(step: u32, progression: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            step: Some(step),
            progression: Some(progression.into()),
            question: Some(question.into()),
        }
    }

    /// Interpret the response, rejecting bodies without step, progression or question.
    pub fn into_step(self) -> Result<QuestionStep> {
        QuestionStep::from_parts(self.step, self.progression, self.question)
    }
}

/// A question together with the game position it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionStep {
    pub step: u32,
    pub progression: String,
    pub question: String,
}

impl QuestionStep {
    pub(crate) fn from_parts(
        step: Option<u32>,
        progression: Option<String>,
        question: Option<String>,
    ) -> Result<Self> {
        let missing = |field: &str| Error::MalformedResponse(format!("missing field '{}'", field));
        Ok(Self {
            step: step.ok_or_else(|| missing("step"))?,
            progression: progression.ok_or_else(|| missing("progression"))?,
            question: question.ok_or_else(|| missing("question"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_from_record() {
        let record = SessionRecord::new("431", "sig").advanced(2, "10.0");
        let form = CancelForm::new(&record, true);
        assert_eq!(form.step, 2);
        assert_eq!(form.progression, "10.0");
        assert_eq!(form.session, "431");
        assert_eq!(form.signature, "sig");
        assert!(form.cm);
    }

    #[test]
    fn test_parse_cancel_response() {
        let body = r#"{"step":"1","progression":"3.2","question":"Is your character from a movie?"}"#;
        let step = serde_json::from_str::<CancelResponse>(body)
            .unwrap()
            .into_step()
            .unwrap();
        assert_eq!(step.step, 1);
        assert_eq!(step.progression, "3.2");
        assert_eq!(step.question, "Is your character from a movie?");
    }

    #[test]
    fn test_missing_question_is_malformed() {
        let response: CancelResponse =
            serde_json::from_str(r#"{"step":1,"progression":"3.2"}"#).unwrap();
        let err = response.into_step().unwrap_err();
        assert!(err.to_string().contains("question"));
    }
}
