//! Error types for postflow-replay

use thiserror::Error;

/// Audit log error type
#[derive(Debug, Error)]
pub enum Error {
    /// No events recorded for the requested session
    #[error("session not found: {0}")]
    NotFound(String),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
