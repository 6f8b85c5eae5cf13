//! Production effect bundle
//!
//! `LiveQuizEffects` wires one handler per effect trait so the session
//! lifecycle can be driven with a single `&E: SessionEffects`.

use crate::pubsub::InMemoryPubSub;
use crate::random::RealRandomHandler;
use crate::storage::MemorySessionStore;
use crate::time::RealTimeHandler;
use async_trait::async_trait;
use livequiz_core::effects::{
    Grant, PhysicalTimeEffects, PubSubEffects, PubSubError, PublishAck, RandomEffects,
    SessionStoreEffects, StorageError, TimeError,
};
use livequiz_core::{
    AccessKey, ChannelName, EventEnvelope, PhysicalTime, Question, Quiz, QuizId, Session,
};

/// Handlers backing a running quiz service
#[derive(Debug, Clone, Default)]
pub struct LiveQuizEffects {
    random: RealRandomHandler,
    time: RealTimeHandler,
    store: MemorySessionStore,
    pubsub: InMemoryPubSub,
}

impl LiveQuizEffects {
    /// OS randomness, system clock, in-memory store and broker
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// The session store
    pub fn store(&self) -> &MemorySessionStore {
        &self.store
    }

    /// The broker
    pub fn pubsub(&self) -> &InMemoryPubSub {
        &self.pubsub
    }
}

#[async_trait]
impl RandomEffects for LiveQuizEffects {
    async fn random_bytes(&self, len: usize) -> Vec<u8> {
        self.random.random_bytes(len).await
    }

    async fn random_u64(&self) -> u64 {
        self.random.random_u64().await
    }
}

#[async_trait]
impl PhysicalTimeEffects for LiveQuizEffects {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        self.time.physical_time().await
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        self.time.sleep_ms(ms).await
    }
}

#[async_trait]
impl SessionStoreEffects for LiveQuizEffects {
    async fn session_exists(&self, key: &AccessKey) -> Result<bool, StorageError> {
        self.store.session_exists(key).await
    }

    async fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        self.store.save_session(session).await
    }

    async fn load_session(&self, key: &AccessKey) -> Result<Option<Session>, StorageError> {
        self.store.load_session(key).await
    }

    async fn destroy_session_cascade(&self, key: &AccessKey) -> Result<usize, StorageError> {
        self.store.destroy_session_cascade(key).await
    }

    async fn load_quiz(&self, quiz_id: &QuizId) -> Result<Option<Quiz>, StorageError> {
        self.store.load_quiz(quiz_id).await
    }

    async fn ordered_questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, StorageError> {
        self.store.ordered_questions(quiz_id).await
    }
}

#[async_trait]
impl PubSubEffects for LiveQuizEffects {
    async fn publish(
        &self,
        channel: &ChannelName,
        envelope: &EventEnvelope,
        auth_key: Option<&AccessKey>,
    ) -> Result<PublishAck, PubSubError> {
        self.pubsub.publish(channel, envelope, auth_key).await
    }

    async fn grant(&self, grant: &Grant) -> Result<(), PubSubError> {
        self.pubsub.grant(grant).await
    }
}
