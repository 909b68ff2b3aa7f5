//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Short description of the failure.
        message: String,
    },

    /// The service answered, but without the fields a game step needs.
    #[error("Unexpected response from Akinator: {0}")]
    MalformedResponse(String),

    /// The begin page did not carry a session token and signature.
    #[error("Error starting game: Session or signature missing")]
    MissingCredentials,

    /// The answer is not one of the five accepted values.
    #[error("Invalid answer: {0}")]
    InvalidAnswer(String),

    /// No live cache entry for the session id.
    #[error("Game session not found. Please start a new game.")]
    SessionNotFound(String),

    /// Language code or name not supported by the service.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

/// Coarse classification of an [`Error`], kept on failed game responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied a bad answer or language.
    InvalidInput,
    /// The session id has no live cache entry.
    SessionNotFound,
    /// The remote service failed or answered with something unusable.
    Remote,
    /// Anything else.
    Other,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        if self.is_session_not_found() {
            ErrorKind::SessionNotFound
        } else if self.is_invalid_input() {
            ErrorKind::InvalidInput
        } else if self.is_remote() {
            ErrorKind::Remote
        } else {
            ErrorKind::Other
        }
    }

    /// Check if this is a session-not-found error.
    pub fn is_session_not_found(&self) -> bool {
        matches!(self, Error::SessionNotFound(_))
    }

    /// Check if the caller can fix this error without restarting anything.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidAnswer(_) | Error::UnsupportedLanguage(_))
    }

    /// Check if this error came from talking to the remote service.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::Json(_)
                | Error::Api { .. }
                | Error::MalformedResponse(_)
                | Error::MissingCredentials
        )
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
