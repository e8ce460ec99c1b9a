//! Error types for the core module.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while configuring or persisting stories.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("API credential not configured. Set INKAI_API_KEY or GEMINI_API_KEY")]
    NotConfigured,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read {key}: {message}")]
    PersistenceRead { key: String, message: String },

    #[error("Failed to write {key}: {message}")]
    PersistenceWrite { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
