//! Error types for the Fabula service
//!
//! This module provides structured error definitions using thiserror and
//! anyhow for error propagation at the application edges.

use thiserror::Error;

/// Main error type for Fabula operations
#[derive(Error, Debug)]
pub enum FabulaError {
    /// Feedback polarity outside the accepted {1, -1} set
    #[error("Invalid feedback value: {0}")]
    InvalidFeedbackValue(i64),

    /// Bad input shape or value (client's fault, never retried)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Aggregation could not be computed
    #[error("Aggregation error: {0}")]
    Aggregation(String),

    /// Completion provider request failed
    #[error("Completion API error: {0}")]
    Completion(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl FabulaError {
    /// True for errors caused by the caller's input, which map to 4xx at the
    /// HTTP boundary; everything else is the server's problem.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FabulaError::InvalidFeedbackValue(_) | FabulaError::Validation(_)
        )
    }
}

/// Result type alias for Fabula operations
pub type Result<T> = std::result::Result<T, FabulaError>;

/// Convert anyhow::Error to FabulaError
impl From<anyhow::Error> for FabulaError {
    fn from(err: anyhow::Error) -> Self {
        FabulaError::Other(err.to_string())
    }
}

/// Convert libsql::Error to FabulaError
impl From<libsql::Error> for FabulaError {
    fn from(err: libsql::Error) -> Self {
        FabulaError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FabulaError::InvalidFeedbackValue(2);
        assert_eq!(err.to_string(), "Invalid feedback value: 2");

        let err = FabulaError::Database("connection refused".to_string());
        assert_eq!(err.to_string(), "Database error: connection refused");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(FabulaError::InvalidFeedbackValue(0).is_client_error());
        assert!(FabulaError::Validation("empty textId".into()).is_client_error());
        assert!(!FabulaError::Database("down".into()).is_client_error());
        assert!(!FabulaError::Aggregation("down".into()).is_client_error());
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: FabulaError = anyhow::anyhow!("something broke").into();
        assert!(matches!(err, FabulaError::Other(_)));
    }
}
