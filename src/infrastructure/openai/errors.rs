use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors that can occur when calling an OpenAI-compatible API
#[derive(Error, Debug)]
pub enum OpenAiApiError {
    /// Invalid request parameters (HTTP 400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid or missing API key (HTTP 401)
    #[error("Invalid API key - authentication failed")]
    InvalidApiKey,

    /// Forbidden - permission denied (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource or model not found (HTTP 404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded - too many requests")]
    RateLimitExceeded,

    /// Server error (HTTP 5xx)
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Unknown or unexpected status
    #[error("Unknown error ({0}): {1}")]
    UnknownError(StatusCode, String),
}

impl OpenAiApiError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => OpenAiApiError::InvalidRequest(body),
            401 => OpenAiApiError::InvalidApiKey,
            403 => OpenAiApiError::Forbidden(body),
            404 => OpenAiApiError::NotFound(body),
            408 => OpenAiApiError::Timeout,
            429 => OpenAiApiError::RateLimitExceeded,
            500..=599 => OpenAiApiError::ServerError(status, body),
            _ => OpenAiApiError::UnknownError(status, body),
        }
    }

    /// Returns true if this error is transient and should be retried
    pub fn is_transient(&self) -> bool {
        match self {
            OpenAiApiError::RateLimitExceeded
            | OpenAiApiError::ServerError(_, _)
            | OpenAiApiError::Timeout => true,
            OpenAiApiError::NetworkError(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            _ => false,
        }
    }

    /// Returns true if this is a permanent error that should not be retried
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            OpenAiApiError::InvalidRequest(_)
                | OpenAiApiError::InvalidApiKey
                | OpenAiApiError::Forbidden(_)
                | OpenAiApiError::NotFound(_)
        )
    }
}

impl From<OpenAiApiError> for DomainError {
    fn from(err: OpenAiApiError) -> Self {
        DomainError::Llm(err.to_string())
    }
}
