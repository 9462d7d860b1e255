// Error taxonomy for the analysis pipeline
// Model, parse and storage failures are never recovered; NotFound is a valid empty result

use std::fmt;
use thiserror::Error;

/// Upstream generation failure.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model backend is not configured: {0}")]
    NotConfigured(String),

    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model backend returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("model returned no text")]
    EmptyResponse,
}

/// Why a model reply could not be split into the four expected sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// The reply was empty or whitespace only.
    EmptyResponse,
    /// Fewer than four blank-line separated sections were found.
    MissingSections { found: usize },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::EmptyResponse => write!(f, "response is empty"),
            MalformedReason::MissingSections { found } => {
                write!(f, "expected 4 sections, found {}", found)
            }
        }
    }
}

/// Response shape violated expectations (strict parse policy only).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed model response: {0}")]
    Malformed(MalformedReason),
}

/// Document store unavailable or rejected a read/write.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("document encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid timestamp {value:?} in document {id}")]
    Timestamp { id: String, value: String },

    #[error("document {0} not readable after insert")]
    MissingAfterInsert(String),

    #[error("store connection lock poisoned")]
    Poisoned,
}

/// Request-level error surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Article not found")]
    NotFound,
}
