//! Unified error system for LiveQuiz
//!
//! One error type covers every session operation. Precondition failures
//! (`Validation`, `NotStarted`, `NoQuestionsAvailable`) are explicit variants so
//! callers never have to inspect messages. "Quiz finished" is an outcome, not
//! a failure, and has no variant.

use crate::channels::ChannelName;
use serde::{Deserialize, Serialize};

/// Why a publish on a session channel did not complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum PublishFailure {
    /// The transport did not confirm within the configured bound
    #[error("publish timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed
        timeout_ms: u64,
    },

    /// The transport refused the credential or the channel is locked
    #[error("publish rejected: {reason}")]
    Rejected {
        /// Transport-supplied reason
        reason: String,
    },

    /// Any other transport-level failure
    #[error("publish transport failure: {reason}")]
    Transport {
        /// Transport-supplied reason
        reason: String,
    },

    /// The envelope could not be encoded; nothing was sent
    #[error("publish encoding failure: {reason}")]
    Encoding {
        /// Encoder error message
        reason: String,
    },
}

impl PublishFailure {
    /// Whether retrying the same publish can reasonably succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transport { .. })
    }
}

/// A grant or revoke call on one channel failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("grant on {channel} failed: {reason}")]
pub struct AuthorizationFailure {
    /// Channel the grant targeted
    pub channel: ChannelName,
    /// Failure reason
    pub reason: String,
    /// Whether the transport reported a transient condition
    pub retryable: bool,
}

/// Unified error type for all LiveQuiz operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum QuizError {
    /// Creation input rejected before anything was persisted
    #[error("Validation failed: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Every candidate access key collided with an existing session
    #[error("Access key allocation exhausted after {attempts} attempts")]
    AllocationExhausted {
        /// Number of candidates tried
        attempts: u32,
    },

    /// The session's quiz has no questions to broadcast
    #[error("Quiz for session {access_key} has no questions")]
    NoQuestionsAvailable {
        /// Session access key
        access_key: String,
    },

    /// The session has not been started yet
    #[error("Session {access_key} has not been started")]
    NotStarted {
        /// Session access key
        access_key: String,
    },

    /// Publishing the target question failed; stored state is unchanged
    #[error("Could not move to question {target_index}: {failure}")]
    AdvanceFailed {
        /// Index that would have become current
        target_index: usize,
        /// Underlying publish failure
        failure: PublishFailure,
    },

    /// Operation not allowed in the session's current phase
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the conflicting state
        message: String,
    },

    /// Session or quiz not found
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found
        message: String,
    },

    /// Storage collaborator failed
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl QuizError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an allocation exhausted error
    pub fn allocation_exhausted(attempts: u32) -> Self {
        Self::AllocationExhausted { attempts }
    }

    /// Create a no-questions error for a session
    pub fn no_questions(access_key: impl ToString) -> Self {
        Self::NoQuestionsAvailable {
            access_key: access_key.to_string(),
        }
    }

    /// Create a not-started error for a session
    pub fn not_started(access_key: impl ToString) -> Self {
        Self::NotStarted {
            access_key: access_key.to_string(),
        }
    }

    /// Create an advance failure
    pub fn advance_failed(target_index: usize, failure: PublishFailure) -> Self {
        Self::AdvanceFailed {
            target_index,
            failure,
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the caller may retry the failed operation unchanged
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::AdvanceFailed { failure, .. } => failure.is_retryable(),
            Self::Storage { .. } => true,
            _ => false,
        }
    }
}

/// Standard Result type for LiveQuiz operations
pub type Result<T> = std::result::Result<T, QuizError>;

impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<toml::de::Error> for QuizError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<std::io::Error> for QuizError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = QuizError::validation("participants should not be empty");
        assert!(matches!(err, QuizError::Validation { .. }));
        assert_eq!(
            err.to_string(),
            "Validation failed: participants should not be empty"
        );
    }

    #[test]
    fn test_publish_failure_retryability() {
        assert!(PublishFailure::Timeout { timeout_ms: 10 }.is_retryable());
        assert!(PublishFailure::Transport {
            reason: "reset".into()
        }
        .is_retryable());
        assert!(!PublishFailure::Rejected {
            reason: "forbidden".into()
        }
        .is_retryable());
        assert!(!PublishFailure::Encoding {
            reason: "key must be a string".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_advance_failed_inherits_retryability() {
        let err = QuizError::advance_failed(1, PublishFailure::Timeout { timeout_ms: 5 });
        assert!(err.is_retryable());
        let err = QuizError::advance_failed(
            1,
            PublishFailure::Rejected {
                reason: "bad auth key".into(),
            },
        );
        assert!(!err.is_retryable());
        assert!(!QuizError::not_started("k").is_retryable());
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "quiz.toml");
        assert!(matches!(QuizError::from(io_err), QuizError::NotFound { .. }));
    }
}
