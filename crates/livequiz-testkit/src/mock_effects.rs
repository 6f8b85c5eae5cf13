//! Mock effects implementation for session testing
//!
//! `MockEffects` implements every LiveQuiz effect trait with deterministic,
//! inspectable behavior:
//!
//! - Seeded ChaCha20 randomness, optionally preceded by scripted byte strings
//!   so tests can force access-key collisions
//! - A controllable clock starting at 2022-01-01 00:00:00 UTC
//! - The real in-memory store and broker, so grants are enforced
//! - A log of every grant call and every delivered publish
//! - Fault injection per channel for grants, and globally for publishes
//!   and saves, plus artificial latency
//!
//! # Blocking Lock Usage
//!
//! Uses `std::sync::Mutex`; the lock is never held across an await point.

#![allow(clippy::disallowed_types)]

use async_trait::async_trait;
use livequiz_core::effects::{
    Grant, PhysicalTimeEffects, PubSubEffects, PubSubError, PublishAck, RandomEffects,
    SessionStoreEffects, StorageError, TimeError,
};
use livequiz_core::{
    AccessKey, ChannelName, EventEnvelope, PhysicalTime, Question, Quiz, QuizId, Session,
};
use livequiz_effects::{InMemoryPubSub, MemorySessionStore};
use rand::RngCore;
use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 2022-01-01 00:00:00 UTC
const EPOCH_MS: u64 = 1_640_995_200_000;

/// An injected failure and how many more calls it applies to
#[derive(Debug, Clone)]
pub struct Fault<E> {
    /// Error returned while the fault is active
    pub error: E,
    /// Remaining calls to fail; `None` fails forever
    pub remaining: Option<u32>,
}

impl<E: Clone> Fault<E> {
    /// Fail every call
    pub fn always(error: E) -> Self {
        Self {
            error,
            remaining: None,
        }
    }

    /// Fail the next `times` calls
    pub fn times(error: E, times: u32) -> Self {
        Self {
            error,
            remaining: Some(times),
        }
    }

    /// Consume one activation; `None` once exhausted
    fn fire(&mut self) -> Option<E> {
        match &mut self.remaining {
            None => Some(self.error.clone()),
            Some(0) => None,
            Some(n) => {
                *n -= 1;
                Some(self.error.clone())
            }
        }
    }
}

/// A publish the broker accepted
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRecord {
    /// Target channel
    pub channel: ChannelName,
    /// Envelope as delivered
    pub envelope: EventEnvelope,
    /// Credential presented
    pub auth_key: Option<AccessKey>,
    /// Broker ordering token
    pub timetoken: u64,
}

/// Mock effects for deterministic session tests
#[derive(Debug, Clone)]
pub struct MockEffects {
    state: Arc<Mutex<MockState>>,
    store: MemorySessionStore,
    broker: InMemoryPubSub,
}

#[derive(Debug)]
struct MockState {
    rng: ChaCha20Rng,
    scripted_bytes: VecDeque<Vec<u8>>,
    physical_time_ms: u64,
    grants: Vec<Grant>,
    grant_attempts: usize,
    publishes: Vec<PublishRecord>,
    publish_attempts: usize,
    grant_faults: HashMap<ChannelName, Fault<PubSubError>>,
    publish_fault: Option<Fault<PubSubError>>,
    save_fault: Option<Fault<StorageError>>,
    grant_latency: Option<Duration>,
    publish_latency: Option<Duration>,
}

impl MockEffects {
    /// Create deterministic mock effects with fixed seed
    pub fn deterministic() -> Self {
        Self::with_seed([42; 32])
    }

    /// Create mock effects with specific seed for reproducible tests
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                rng: ChaCha20Rng::from_seed(seed),
                scripted_bytes: VecDeque::new(),
                physical_time_ms: EPOCH_MS,
                grants: Vec::new(),
                grant_attempts: 0,
                publishes: Vec::new(),
                publish_attempts: 0,
                grant_faults: HashMap::new(),
                publish_fault: None,
                save_fault: None,
                grant_latency: None,
                publish_latency: None,
            })),
            store: MemorySessionStore::new(),
            broker: InMemoryPubSub::new(),
        }
    }

    /// Register a quiz in the backing store
    pub async fn insert_quiz(&self, quiz: Quiz) {
        self.store.insert_quiz(quiz).await;
    }

    /// The backing store
    pub fn store(&self) -> &MemorySessionStore {
        &self.store
    }

    /// The backing broker
    pub fn broker(&self) -> &InMemoryPubSub {
        &self.broker
    }

    /// Queue byte strings returned by `random_bytes` before the RNG is used
    pub fn script_random_bytes<I>(&self, values: I)
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        self.state.lock().unwrap().scripted_bytes.extend(values);
    }

    /// Move the clock forward
    pub fn advance_time(&self, ms: u64) {
        self.state.lock().unwrap().physical_time_ms += ms;
    }

    /// Fail grants on `channel`
    pub fn fail_grants_on(&self, channel: ChannelName, fault: Fault<PubSubError>) {
        self.state.lock().unwrap().grant_faults.insert(channel, fault);
    }

    /// Fail publishes
    pub fn fail_publishes(&self, fault: Fault<PubSubError>) {
        self.state.lock().unwrap().publish_fault = Some(fault);
    }

    /// Fail session saves
    pub fn fail_saves(&self, fault: Fault<StorageError>) {
        self.state.lock().unwrap().save_fault = Some(fault);
    }

    /// Remove every injected fault
    pub fn clear_faults(&self) {
        let mut state = self.state.lock().unwrap();
        state.grant_faults.clear();
        state.publish_fault = None;
        state.save_fault = None;
    }

    /// Delay every grant call
    pub fn set_grant_latency(&self, latency: Duration) {
        self.state.lock().unwrap().grant_latency = Some(latency);
    }

    /// Delay every publish call
    pub fn set_publish_latency(&self, latency: Duration) {
        self.state.lock().unwrap().publish_latency = Some(latency);
    }

    /// Grants that reached the broker, in order
    pub fn grants(&self) -> Vec<Grant> {
        self.state.lock().unwrap().grants.clone()
    }

    /// Grant calls including failed ones
    pub fn grant_attempts(&self) -> usize {
        self.state.lock().unwrap().grant_attempts
    }

    /// Publishes the broker accepted, in order
    pub fn publishes(&self) -> Vec<PublishRecord> {
        self.state.lock().unwrap().publishes.clone()
    }

    /// Publish calls including failed ones
    pub fn publish_attempts(&self) -> usize {
        self.state.lock().unwrap().publish_attempts
    }

    /// Forget recorded grants and publishes
    pub fn clear_logs(&self) {
        let mut state = self.state.lock().unwrap();
        state.grants.clear();
        state.grant_attempts = 0;
        state.publishes.clear();
        state.publish_attempts = 0;
    }
}

#[async_trait]
impl RandomEffects for MockEffects {
    async fn random_bytes(&self, len: usize) -> Vec<u8> {
        let mut state = self.state.lock().unwrap();
        if let Some(bytes) = state.scripted_bytes.pop_front() {
            return bytes;
        }
        let mut bytes = vec![0u8; len];
        state.rng.fill_bytes(&mut bytes);
        bytes
    }

    async fn random_u64(&self) -> u64 {
        self.state.lock().unwrap().rng.next_u64()
    }
}

#[async_trait]
impl PhysicalTimeEffects for MockEffects {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        let state = self.state.lock().unwrap();
        Ok(PhysicalTime {
            ts_ms: state.physical_time_ms,
            uncertainty: None,
        })
    }

    async fn sleep_ms(&self, duration_ms: u64) -> Result<(), TimeError> {
        let mut state = self.state.lock().unwrap();
        state.physical_time_ms += duration_ms;
        Ok(())
    }
}

#[async_trait]
impl SessionStoreEffects for MockEffects {
    async fn session_exists(&self, key: &AccessKey) -> Result<bool, StorageError> {
        self.store.session_exists(key).await
    }

    async fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        let fault = self
            .state
            .lock()
            .unwrap()
            .save_fault
            .as_mut()
            .and_then(Fault::fire);
        if let Some(error) = fault {
            return Err(error);
        }
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
impl PubSubEffects for MockEffects {
    async fn publish(
        &self,
        channel: &ChannelName,
        envelope: &EventEnvelope,
        auth_key: Option<&AccessKey>,
    ) -> Result<PublishAck, PubSubError> {
        let (latency, fault) = {
            let mut state = self.state.lock().unwrap();
            state.publish_attempts += 1;
            let fault = state.publish_fault.as_mut().and_then(Fault::fire);
            (state.publish_latency, fault)
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = fault {
            return Err(error);
        }

        let ack = self.broker.publish(channel, envelope, auth_key).await?;
        self.state.lock().unwrap().publishes.push(PublishRecord {
            channel: channel.clone(),
            envelope: envelope.clone(),
            auth_key: auth_key.cloned(),
            timetoken: ack.timetoken,
        });
        Ok(ack)
    }

    async fn grant(&self, grant: &Grant) -> Result<(), PubSubError> {
        let (latency, fault) = {
            let mut state = self.state.lock().unwrap();
            state.grant_attempts += 1;
            let fault = state
                .grant_faults
                .get_mut(&grant.channel)
                .and_then(Fault::fire);
            (state.grant_latency, fault)
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = fault {
            return Err(error);
        }

        self.broker.grant(grant).await?;
        self.state.lock().unwrap().grants.push(grant.clone());
        Ok(())
    }
}
