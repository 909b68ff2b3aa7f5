//! Begin endpoint: starts a game and returns an HTML page.

use scraper::{Html, Selector};
use serde::Serialize;

/// Form body of the begin request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeginForm {
    /// Child mode flag.
    pub cm: bool,
    pub sid: &'static str,
}

impl BeginForm {
    pub fn new(child_mode: bool) -> Self {
        Self {
            cm: child_mode,
            sid: "1",
        }
    }
}

/// Fields extracted from the begin page.
///
/// Missing or empty values are `None`; deciding whether that is fatal is
/// left to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeginPage {
    /// First question, empty if the page had none.
    pub question: String,
    pub session: Option<String>,
    pub signature: Option<String>,
}

impl BeginPage {
    /// Page carrying all three values.
    pub fn new(
        question: impl Into<String>,
        session: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            session: Some(session.into()),
            signature: Some(signature.into()),
        }
    }

    /// Session token and signature, if both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.session.as_deref(), self.signature.as_deref()) {
            (Some(session), Some(signature)) => Some((session, signature)),
            _ => None,
        }
    }
}

/// Extract the first question and the hidden session fields from the begin page.
pub fn parse_begin_page(html: &str) -> BeginPage {
    let document = Html::parse_document(html);

    let question = Selector::parse("#question-label")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
        })
        .unwrap_or_default();

    BeginPage {
        question,
        session: hidden_input(&document, "session"),
        signature: hidden_input(&document, "signature"),
    }
}

/// Value of `form#askSoundlike input[name=<name>]`, if present and non-empty.
fn hidden_input(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"form#askSoundlike input[name="{}"]"#, name)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("value"))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
