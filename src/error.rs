//! Error types for batch operations.
//!
//! Only startup and batch-level failures are errors here. A command that exits
//! non-zero, fails to launch or times out is recorded in its
//! [`ExecutionRecord`](crate::command::ExecutionRecord) instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing command template: expected the `--` marker followed by a control-plane command")]
    MissingCommandTemplate,

    #[error("Environment precondition failed: {0}")]
    EnvironmentPrecondition(String),

    #[error("Invalid range '{token}': {reason}")]
    InvalidRange { token: String, reason: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Failed to open output file '{path}': {reason}")]
    OutputFile { path: String, reason: String },

    #[error("Status probe failed for {target}: {reason}")]
    StatusProbe { target: String, reason: String },

    #[error("Command({seq}/{total}) not ready to run: {reason}")]
    NotReady {
        seq: usize,
        total: usize,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BatchError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an invalid range error for a single comma-separated token
    pub fn invalid_range(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Create a status probe error
    pub fn status_probe(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StatusProbe {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error aborts the process before any command runs
    pub fn is_startup_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_)
                | Self::MissingCommandTemplate
                | Self::EnvironmentPrecondition(_)
                | Self::InvalidRange { .. }
                | Self::Database(_)
                | Self::OutputFile { .. }
        )
    }
}

impl From<serde_json::Error> for BatchError {
    fn from(error: serde_json::Error) -> Self {
        BatchError::Serialization(format!("JSON serialization error: {error}"))
    }
}

impl From<sqlx::Error> for BatchError {
    fn from(err: sqlx::Error) -> Self {
        BatchError::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_error_classification() {
        assert!(BatchError::MissingCommandTemplate.is_startup_error());
        assert!(BatchError::invalid_range("5-3", "descending").is_startup_error());
        assert!(!BatchError::status_probe("lb1", "boom").is_startup_error());
        assert!(!BatchError::NotReady {
            seq: 3,
            total: 5,
            reason: "pending".to_string()
        }
        .is_startup_error());
    }

    #[test]
    fn test_not_ready_message_carries_position() {
        let err = BatchError::NotReady {
            seq: 3,
            total: 5,
            reason: "still PENDING_UPDATE".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Command(3/5) not ready to run: still PENDING_UPDATE"
        );
    }
}
