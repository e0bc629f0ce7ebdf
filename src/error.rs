//! Journal error types

use thiserror::Error;

use crate::db::DbError;

/// Errors produced by journal operations
#[derive(Debug, Error)]
pub enum JournalError {
    /// Input rejected before any state change
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Import document rejected before any state change
    #[error("invalid import document: {0}")]
    Import(String),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for journal operations
pub type JournalResult<T> = Result<T, JournalError>;
