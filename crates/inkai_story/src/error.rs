//! Error types for the story pipeline.
//!
//! `ApiError` describes what went wrong on the wire. The resolver and the
//! generation service translate it into `ResolutionError` and
//! `GenerationError`, which `StoryError` bundles for callers.

use thiserror::Error;

/// Result type alias for raw API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for story operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// Failure talking to the generative API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("API error {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status { status: u16, message: Option<String> },

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Network failures, server errors and rate limits may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Decode(_) => false,
        }
    }
}

/// No usable model could be found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Model catalog request failed: {0}")]
    Catalog(ApiError),

    #[error("No model in the catalog supports generateContent")]
    NoCapableModel,
}

/// The generation request failed or returned nothing usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    Request(String),

    #[error("Generation rejected ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Api { status: u16, message: Option<String> },

    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),

    #[error("Generated text contained no story lines")]
    EmptyStory,
}

impl From<ApiError> for GenerationError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(msg) => Self::Request(msg),
            ApiError::Status { status, message } => Self::Api { status, message },
            ApiError::Decode(msg) => Self::MalformedResponse(msg),
        }
    }
}

/// Any failure of one generation attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoryError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Generation cancelled")]
    Cancelled,
}

impl StoryError {
    /// Whether trying the same prompt again later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Resolution(ResolutionError::Catalog(e)) => e.is_retryable(),
            Self::Resolution(ResolutionError::NoCapableModel) => false,
            Self::Generation(GenerationError::Request(_)) => true,
            Self::Generation(GenerationError::Api { status, .. }) => {
                *status >= 500 || *status == 429
            }
            Self::Generation(_) => false,
            Self::Cancelled => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::Transport("reset".into()).is_retryable());
        assert!(ApiError::Status { status: 503, message: None }.is_retryable());
        assert!(ApiError::Status { status: 429, message: None }.is_retryable());
        assert!(!ApiError::Status { status: 400, message: None }.is_retryable());
        assert!(!ApiError::Decode("eof".into()).is_retryable());
    }

    #[test]
    fn test_api_error_maps_to_generation_error() {
        let err: GenerationError = ApiError::Status {
            status: 400,
            message: Some("API key not valid".into()),
        }
        .into();
        assert_eq!(
            err,
            GenerationError::Api {
                status: 400,
                message: Some("API key not valid".into())
            }
        );

        let err: GenerationError = ApiError::Decode("expected value".into()).into();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn test_messages() {
        let err = StoryError::from(GenerationError::Api {
            status: 403,
            message: Some("denied".into()),
        });
        assert_eq!(err.to_string(), "Generation rejected (403): denied");

        let err = StoryError::from(ResolutionError::NoCapableModel);
        assert_eq!(err.to_string(), "No model in the catalog supports generateContent");
        assert!(!err.is_retryable());
    }
}
