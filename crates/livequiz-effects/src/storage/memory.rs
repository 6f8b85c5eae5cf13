//! In-memory session store
//!
//! Keeps sessions keyed by access key and quizzes keyed by id. Destroyed
//! sessions stay behind as tombstones so their key is never handed out again
//! and late operations on them report an invalid state instead of not-found.

use async_trait::async_trait;
use livequiz_core::effects::{SessionStoreEffects, StorageError};
use livequiz_core::{AccessKey, Question, Quiz, QuizId, Session, SessionPhase};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage for sessions and quizzes
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<AccessKey, Session>>>,
    quizzes: Arc<RwLock<HashMap<QuizId, Quiz>>>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a quiz so sessions can be created for it
    pub async fn insert_quiz(&self, quiz: Quiz) {
        self.quizzes.write().await.insert(quiz.id, quiz);
    }

    /// Number of stored session records, tombstones included
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Snapshot of every stored session
    pub async fn sessions(&self) -> Vec<Session> {
        self.sessions.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl SessionStoreEffects for MemorySessionStore {
    async fn session_exists(&self, key: &AccessKey) -> Result<bool, StorageError> {
        Ok(self.sessions.read().await.contains_key(key))
    }

    async fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        if let Some(stray) = session
            .participants
            .iter()
            .find(|p| p.session_key != session.access_key)
        {
            return Err(StorageError::Conflict {
                key: session.access_key.to_string(),
                reason: format!("participant {} belongs to session {}", stray.id, stray.session_key),
            });
        }
        let mut sessions = self.sessions.write().await;
        if let Some(existing) = sessions.get(&session.access_key) {
            if existing.id != session.id {
                return Err(StorageError::Conflict {
                    key: session.access_key.to_string(),
                    reason: "access key already belongs to another session".to_string(),
                });
            }
        }
        sessions.insert(session.access_key.clone(), session.clone());
        Ok(())
    }

    async fn load_session(&self, key: &AccessKey) -> Result<Option<Session>, StorageError> {
        Ok(self.sessions.read().await.get(key).cloned())
    }

    async fn destroy_session_cascade(&self, key: &AccessKey) -> Result<usize, StorageError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(key).ok_or_else(|| StorageError::NotFound {
            key: key.to_string(),
        })?;
        let removed = session.participants.len();
        session.participants.clear();
        session.phase = SessionPhase::Destroyed;
        Ok(removed)
    }

    async fn load_quiz(&self, quiz_id: &QuizId) -> Result<Option<Quiz>, StorageError> {
        Ok(self.quizzes.read().await.get(quiz_id).cloned())
    }

    async fn ordered_questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, StorageError> {
        let quizzes = self.quizzes.read().await;
        let quiz = quizzes.get(quiz_id).ok_or_else(|| StorageError::NotFound {
            key: quiz_id.to_string(),
        })?;
        Ok(quiz.ordered_questions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use livequiz_core::{Participant, ParticipantId, QuestionId, SessionId};
    use uuid::Uuid;

    fn quiz() -> Quiz {
        let question = |n: u128, rank| Question {
            id: QuestionId::from_uuid(Uuid::from_u128(n)),
            rank,
            title: format!("Q{n}"),
            answers: vec!["a".into(), "b".into()],
            content: serde_json::Value::Null,
        };
        Quiz {
            id: QuizId::from_uuid(Uuid::from_u128(100)),
            access_key: AccessKey::from_bytes([9; 8]),
            title: "memory".into(),
            questions: vec![question(1, 2), question(2, 1)],
        }
    }

    fn session(key: [u8; 8], id: u128) -> Session {
        Session {
            id: SessionId::from_uuid(Uuid::from_u128(id)),
            access_key: AccessKey::from_bytes(key),
            quiz_id: QuizId::from_uuid(Uuid::from_u128(100)),
            quiz_auth_key: AccessKey::from_bytes([9; 8]),
            phase: SessionPhase::Created,
            starting_date: None,
            current_question_index: None,
            participants: vec![
                Participant {
                    id: ParticipantId::from_uuid(Uuid::from_u128(id + 1)),
                    session_key: AccessKey::from_bytes(key),
                    name: "Ada".into(),
                    email: "ada@example.org".into(),
                },
                Participant {
                    id: ParticipantId::from_uuid(Uuid::from_u128(id + 2)),
                    session_key: AccessKey::from_bytes(key),
                    name: "Grace".into(),
                    email: String::new(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let store = MemorySessionStore::new();
        let s = session([1; 8], 10);
        assert!(!store.session_exists(&s.access_key).await.unwrap());
        store.save_session(&s).await.unwrap();
        assert!(store.session_exists(&s.access_key).await.unwrap());
        assert_eq!(store.load_session(&s.access_key).await.unwrap(), Some(s));
    }

    #[tokio::test]
    async fn participants_must_belong_to_the_session() {
        let store = MemorySessionStore::new();
        let mut s = session([3; 8], 30);
        s.participants[1].session_key = AccessKey::from_bytes([4; 8]);
        let err = store.save_session(&s).await.unwrap_err();
        assert_matches!(err, StorageError::Conflict { .. });
        assert!(!store.session_exists(&s.access_key).await.unwrap());
    }

    #[tokio::test]
    async fn foreign_session_cannot_take_a_key() {
        let store = MemorySessionStore::new();
        store.save_session(&session([1; 8], 10)).await.unwrap();
        let err = store.save_session(&session([1; 8], 20)).await.unwrap_err();
        assert_matches!(err, StorageError::Conflict { .. });
    }

    #[tokio::test]
    async fn cascade_removes_participants_and_keeps_tombstone() {
        let store = MemorySessionStore::new();
        let s = session([2; 8], 10);
        store.save_session(&s).await.unwrap();

        let removed = store.destroy_session_cascade(&s.access_key).await.unwrap();
        assert_eq!(removed, 2);

        let tomb = store.load_session(&s.access_key).await.unwrap().unwrap();
        assert!(tomb.participants.is_empty());
        assert_eq!(tomb.phase, SessionPhase::Destroyed);
        assert!(store.session_exists(&s.access_key).await.unwrap());
    }

    #[tokio::test]
    async fn cascade_on_unknown_key_is_not_found() {
        let store = MemorySessionStore::new();
        let err = store
            .destroy_session_cascade(&AccessKey::from_bytes([3; 8]))
            .await
            .unwrap_err();
        assert_matches!(err, StorageError::NotFound { .. });
    }

    #[tokio::test]
    async fn questions_come_back_ranked() {
        let store = MemorySessionStore::new();
        let quiz = quiz();
        store.insert_quiz(quiz.clone()).await;
        let titles: Vec<_> = store
            .ordered_questions(&quiz.id)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.title)
            .collect();
        assert_eq!(titles, vec!["Q2", "Q1"]);
        assert_eq!(store.load_quiz(&quiz.id).await.unwrap(), Some(quiz));
    }
}
