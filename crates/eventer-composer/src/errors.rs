//! Composer-local error type. A composer failure is permanent: the caller
//! (the event producer, C3) stores a stop-event and exits its tick loop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposerError {
    #[error("schema template error: {0}")]
    Template(String),

    #[error("built-in argument error: {0}")]
    BadArgument(String),

    #[error("date/duration parse error: {0}")]
    BadDuration(String),

    #[error("schema did not evaluate to a JSON object")]
    NotAnObject,

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<minijinja::Error> for ComposerError {
    fn from(e: minijinja::Error) -> Self {
        ComposerError::Template(e.to_string())
    }
}
