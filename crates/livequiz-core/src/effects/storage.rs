//! Session storage effect interface
//!
//! # Effect Classification
//!
//! - **Category**: Application Effect (external collaborator)
//! - **Implementation**: `livequiz-effects::MemorySessionStore`, or a database-backed
//!   handler supplied by the embedding application
//! - **Usage**: Key uniqueness checks, durable session records, cascade deletion,
//!   ranked question lookup
//!
//! A successful `save_session` is the durability boundary: lifecycle hooks that
//! touch the transport only run after it returns `Ok`.

use crate::errors::QuizError;
use crate::identifiers::{AccessKey, QuizId};
use crate::quiz::{Question, Quiz};
use crate::session::Session;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum StorageError {
    /// Record does not exist
    #[error("Record not found: {key}")]
    NotFound {
        /// Key that was looked up
        key: String,
    },
    /// Record already exists with conflicting content
    #[error("Conflict on {key}: {reason}")]
    Conflict {
        /// Conflicting key
        key: String,
        /// Reason for the conflict
        reason: String,
    },
    /// Write failed
    #[error("Write failed: {0}")]
    WriteFailed(String),
    /// Read failed
    #[error("Read failed: {0}")]
    ReadFailed(String),
}

impl From<StorageError> for QuizError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { key } => QuizError::not_found(key),
            other => QuizError::storage(other.to_string()),
        }
    }
}

/// Durable storage of sessions, participants and quizzes
#[async_trait]
pub trait SessionStoreEffects: Send + Sync {
    /// Whether any session already uses `key`
    async fn session_exists(&self, key: &AccessKey) -> Result<bool, StorageError>;

    /// Insert or replace the session record (including its participants)
    async fn save_session(&self, session: &Session) -> Result<(), StorageError>;

    /// Load a session record
    async fn load_session(&self, key: &AccessKey) -> Result<Option<Session>, StorageError>;

    /// Delete every participant owned by the session and mark it destroyed.
    ///
    /// Returns the number of participants removed.
    async fn destroy_session_cascade(&self, key: &AccessKey) -> Result<usize, StorageError>;

    /// Load a quiz
    async fn load_quiz(&self, quiz_id: &QuizId) -> Result<Option<Quiz>, StorageError>;

    /// The quiz's questions ordered by rank
    async fn ordered_questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, StorageError>;
}

/// Blanket implementation for Arc<T> where T: SessionStoreEffects
#[async_trait]
impl<T: SessionStoreEffects + ?Sized> SessionStoreEffects for Arc<T> {
    async fn session_exists(&self, key: &AccessKey) -> Result<bool, StorageError> {
        (**self).session_exists(key).await
    }

    async fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        (**self).save_session(session).await
    }

    async fn load_session(&self, key: &AccessKey) -> Result<Option<Session>, StorageError> {
        (**self).load_session(key).await
    }

    async fn destroy_session_cascade(&self, key: &AccessKey) -> Result<usize, StorageError> {
        (**self).destroy_session_cascade(key).await
    }

    async fn load_quiz(&self, quiz_id: &QuizId) -> Result<Option<Quiz>, StorageError> {
        (**self).load_quiz(quiz_id).await
    }

    async fn ordered_questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, StorageError> {
        (**self).ordered_questions(quiz_id).await
    }
}
