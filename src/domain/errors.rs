//! Domain errors for the teaching assistant.

use thiserror::Error;

/// Domain-level errors that can occur in the teaching assistant.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Course not found: {0}")]
    CourseNotFound(String),

    #[error("Course '{course}' has no lesson {index}")]
    LessonNotFound { course: String, index: usize },

    #[error("Learning material not found: {0}")]
    MaterialNotFound(String),

    #[error("Invalid course name '{name}': {reason}")]
    InvalidCourseName { name: String, reason: String },

    #[error("Invalid upload '{filename}': {reason}")]
    InvalidUpload { filename: String, reason: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Language model error: {0}")]
    Llm(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Missing API key: {0}")]
    MissingApiKey(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether the error stems from caller input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::CourseNotFound(_)
                | DomainError::LessonNotFound { .. }
                | DomainError::MaterialNotFound(_)
                | DomainError::InvalidCourseName { .. }
                | DomainError::InvalidUpload { .. }
                | DomainError::UnsupportedFormat(_)
                | DomainError::ValidationFailed(_)
        )
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(DomainError::CourseNotFound("x".into()).is_client_error());
        assert!(DomainError::ValidationFailed("x".into()).is_client_error());
        assert!(DomainError::MaterialNotFound("x".into()).is_client_error());
        assert!(!DomainError::Storage("disk".into()).is_client_error());
        assert!(!DomainError::Llm("down".into()).is_client_error());
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let err: DomainError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, DomainError::Storage(msg) if msg.contains("boom")));
    }
}
