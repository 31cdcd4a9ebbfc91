//! Error types

use thiserror::Error;

/// Errors surfaced by configuration and invariant checks.
///
/// Gameplay commands never return these; an invalid command is simply not applied.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
