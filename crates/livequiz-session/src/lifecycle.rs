//! Session lifecycle
//!
//! Drives a session through `Created → Authorized → Started → Destroyed`.
//!
//! The lifecycle follows the per-call effects pattern: it holds configuration
//! and the per-session lock table, and every operation receives the effect
//! handler as an argument.
//!
//! Transport work only happens after a durability boundary. Channel grants
//! run once the created or destroyed record is committed. Question publishes
//! are computed on a copy of the stored record, and the copy is persisted only
//! after the transport acknowledges, so a failed publish leaves nothing
//! half-applied.
//!
//! `start`, `switch_to_next` and `destroy` on the same session are serialized
//! behind an async mutex held from the initial read to the final write.

use crate::allocator::AccessKeyAllocator;
use crate::authorization::{AuthorizationReport, ChannelAuthorizationManager};
use crate::progression::QuestionProgression;
use crate::publisher::EventPublisher;
use livequiz_core::effects::{SessionEffects, TimeError};
use livequiz_core::{
    AccessKey, Participant, ParticipantDraft, ParticipantId, Question, Quiz, QuizConfig,
    QuizError, Result, Session, SessionId, SessionPhase,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of moving to the next question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advance {
    /// The question at this index is now current and was published
    Advanced(usize),
    /// The last question was already current; nothing changed
    QuizFinished,
}

/// A session created, persisted and authorized in one go
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedSession {
    /// The stored session
    pub session: Session,
    /// Grants issued on commit
    pub authorization: AuthorizationReport,
}

/// What `destroy` did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyReport {
    /// Participants deleted with the session
    pub participants_removed: usize,
    /// Lock-down grants issued after the deletion committed
    pub authorization: AuthorizationReport,
}

type SessionLock = Arc<async_lock::Mutex<()>>;

/// Session lifecycle handler
///
/// # Example
///
/// ```ignore
/// let lifecycle = SessionLifecycle::new(QuizConfig::default());
/// let opened = lifecycle.open(&effects, Some(&quiz), drafts).await?;
/// lifecycle.start(&effects, &opened.session.access_key).await?;
/// ```
#[derive(Debug)]
pub struct SessionLifecycle {
    config: QuizConfig,
    allocator: AccessKeyAllocator,
    authorization: ChannelAuthorizationManager,
    publisher: EventPublisher,
    locks: Mutex<HashMap<AccessKey, SessionLock>>,
}

impl SessionLifecycle {
    fn map_time_err(err: TimeError) -> QuizError {
        QuizError::internal(format!("time error: {err}"))
    }

    /// Create a lifecycle handler from configuration
    pub fn new(config: QuizConfig) -> Self {
        Self {
            allocator: AccessKeyAllocator::from_config(&config),
            authorization: ChannelAuthorizationManager::from_config(&config),
            publisher: EventPublisher::from_config(&config),
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    fn session_lock(&self, key: &AccessKey) -> SessionLock {
        self.locks
            .lock()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(async_lock::Mutex::new(())))
            .clone()
    }

    async fn load<E: SessionEffects>(&self, effects: &E, key: &AccessKey) -> Result<Session> {
        match effects.load_session(key).await? {
            Some(session) => Ok(session),
            None => {
                self.locks.lock().remove(key);
                Err(QuizError::not_found(format!("session {key}")))
            }
        }
    }

    fn ensure_live(&self, session: &Session) -> Result<()> {
        if session.is_destroyed() {
            self.locks.lock().remove(&session.access_key);
            return Err(QuizError::invalid_state(format!(
                "session {} has been destroyed",
                session.access_key
            )));
        }
        Ok(())
    }

    /// Build a new session for `quiz` with the non-blank `drafts`
    ///
    /// The quiz must already be stored. Allocates the access key but does not
    /// persist anything.
    pub async fn create<E: SessionEffects>(
        &self,
        effects: &E,
        quiz: Option<&Quiz>,
        drafts: Vec<ParticipantDraft>,
    ) -> Result<Session> {
        let quiz = quiz.ok_or_else(|| QuizError::validation("quiz must exist"))?;
        if effects.load_quiz(&quiz.id).await?.is_none() {
            return Err(QuizError::validation(format!("quiz {} is not stored", quiz.id)));
        }

        let drafts: Vec<ParticipantDraft> = drafts.into_iter().filter(|d| !d.is_blank()).collect();
        if drafts.is_empty() {
            return Err(QuizError::validation("at least one participant is required"));
        }

        let access_key = self.allocator.allocate(effects).await?;
        let id = SessionId::from_uuid(effects.random_uuid().await);

        let mut participants = Vec::with_capacity(drafts.len());
        for draft in drafts {
            participants.push(Participant {
                id: ParticipantId::from_uuid(effects.random_uuid().await),
                session_key: access_key.clone(),
                name: draft.name,
                email: draft.email,
            });
        }

        tracing::info!(
            access_key = %access_key,
            quiz = %quiz.id,
            participants = participants.len(),
            "session created"
        );

        Ok(Session {
            id,
            access_key,
            quiz_id: quiz.id,
            quiz_auth_key: quiz.access_key.clone(),
            phase: SessionPhase::Created,
            starting_date: None,
            current_question_index: None,
            participants,
        })
    }

    /// Durably store a freshly created session
    pub async fn persist_created<E: SessionEffects>(&self, effects: &E, session: &Session) -> Result<()> {
        if session.phase != SessionPhase::Created {
            return Err(QuizError::invalid_state(format!(
                "session {} is {}, expected created",
                session.access_key, session.phase
            )));
        }
        if effects.session_exists(&session.access_key).await? {
            return Err(QuizError::invalid_state(format!(
                "access key {} is already in use",
                session.access_key
            )));
        }
        effects.save_session(session).await?;
        Ok(())
    }

    /// Lock every channel, then open server and client to the quiz credential
    ///
    /// Runs once per session, after `persist_created`. Grant failures are
    /// reported in the returned report and do not roll the session back.
    pub async fn on_create_committed<E: SessionEffects>(
        &self,
        effects: &E,
        key: &AccessKey,
    ) -> Result<AuthorizationReport> {
        let lock = self.session_lock(key);
        let _guard = lock.lock().await;

        let mut session = self.load(effects, key).await?;
        if session.phase != SessionPhase::Created {
            return Err(QuizError::invalid_state(format!(
                "session {key} is {}, channels were already authorized",
                session.phase
            )));
        }

        let mut report = self.authorization.lock_all(effects, &session).await;
        report.extend(self.authorization.authorize_quiz_scope(effects, &session).await);

        session.phase = SessionPhase::Authorized;
        effects.save_session(&session).await?;

        if report.is_complete() {
            tracing::info!(access_key = %key, "session authorized");
        } else {
            tracing::warn!(
                access_key = %key,
                failed = report.failures().count(),
                "session authorized with failed grants"
            );
        }
        Ok(report)
    }

    /// Create, persist and authorize a session
    pub async fn open<E: SessionEffects>(
        &self,
        effects: &E,
        quiz: Option<&Quiz>,
        drafts: Vec<ParticipantDraft>,
    ) -> Result<OpenedSession> {
        let session = self.create(effects, quiz, drafts).await?;
        self.persist_created(effects, &session).await?;
        let authorization = self.on_create_committed(effects, &session.access_key).await?;
        let session = self.load(effects, &session.access_key).await?;
        Ok(OpenedSession {
            session,
            authorization,
        })
    }

    /// Make the first question current and broadcast it
    pub async fn start<E: SessionEffects>(&self, effects: &E, key: &AccessKey) -> Result<Session> {
        let lock = self.session_lock(key);
        let _guard = lock.lock().await;

        let stored = self.load(effects, key).await?;
        self.ensure_live(&stored)?;
        if stored.started() {
            return Err(QuizError::invalid_state(format!("session {key} already started")));
        }
        if stored.phase != SessionPhase::Authorized {
            return Err(QuizError::invalid_state(format!(
                "session {key} is {}, expected authorized",
                stored.phase
            )));
        }

        let questions = effects.ordered_questions(&stored.quiz_id).await?;
        let first = QuestionProgression::first(questions.len())
            .ok_or_else(|| QuizError::no_questions(key))?;
        let now = effects.physical_time().await.map_err(Self::map_time_err)?;

        let mut next = stored;
        next.starting_date = Some(now);
        next.current_question_index = Some(first);
        next.phase = SessionPhase::Started;

        self.publisher
            .publish_question(effects, &next, &questions[first])
            .await
            .map_err(|failure| {
                tracing::warn!(access_key = %key, index = first, %failure, "start publish failed");
                QuizError::advance_failed(first, failure)
            })?;
        effects.save_session(&next).await?;

        tracing::info!(
            access_key = %key,
            questions = questions.len(),
            "session started"
        );
        Ok(next)
    }

    /// Move to the next question and broadcast it
    ///
    /// Returns `Advance::QuizFinished` without publishing when the last
    /// question is already current.
    pub async fn switch_to_next<E: SessionEffects>(&self, effects: &E, key: &AccessKey) -> Result<Advance> {
        let lock = self.session_lock(key);
        let _guard = lock.lock().await;

        let stored = self.load(effects, key).await?;
        self.ensure_live(&stored)?;
        if !stored.started() {
            return Err(QuizError::not_started(key));
        }
        let index = stored
            .current_question_index
            .ok_or_else(|| QuizError::internal(format!("started session {key} has no index")))?;

        let questions = effects.ordered_questions(&stored.quiz_id).await?;
        let Some(target) = QuestionProgression::advance(index, questions.len()) else {
            tracing::info!(access_key = %key, index, "quiz finished");
            return Ok(Advance::QuizFinished);
        };

        let mut next = stored;
        next.current_question_index = Some(target);

        self.publisher
            .publish_question(effects, &next, &questions[target])
            .await
            .map_err(|failure| {
                tracing::warn!(access_key = %key, index = target, %failure, "advance publish failed");
                QuizError::advance_failed(target, failure)
            })?;
        effects.save_session(&next).await?;

        tracing::info!(
            access_key = %key,
            index = target,
            remaining = QuestionProgression::remaining(target, questions.len()),
            "advanced to next question"
        );
        Ok(Advance::Advanced(target))
    }

    /// Delete the session's participants, then lock its channels
    pub async fn destroy<E: SessionEffects>(&self, effects: &E, key: &AccessKey) -> Result<DestroyReport> {
        let lock = self.session_lock(key);
        let report = {
            let _guard = lock.lock().await;

            let stored = self.load(effects, key).await?;
            self.ensure_live(&stored)?;

            let participants_removed = effects.destroy_session_cascade(key).await?;
            let destroyed = Session {
                phase: SessionPhase::Destroyed,
                participants: Vec::new(),
                ..stored
            };
            let authorization = self.on_destroy_committed(effects, &destroyed).await;

            tracing::info!(
                access_key = %key,
                participants_removed,
                locked = authorization.is_complete(),
                "session destroyed"
            );
            DestroyReport {
                participants_removed,
                authorization,
            }
        };
        self.locks.lock().remove(key);
        Ok(report)
    }

    /// Lock every channel of a destroyed session
    pub async fn on_destroy_committed<E: SessionEffects>(&self, effects: &E, session: &Session) -> AuthorizationReport {
        self.authorization.lock_all(effects, session).await
    }

    /// The session's current question, if started
    pub async fn current_question<E: SessionEffects>(
        &self,
        effects: &E,
        key: &AccessKey,
    ) -> Result<Option<Question>> {
        let session = self.load(effects, key).await?;
        self.ensure_live(&session)?;
        if !session.started() {
            return Ok(None);
        }
        let questions = effects.ordered_questions(&session.quiz_id).await?;
        Ok(session.current_question(&questions).cloned())
    }
}

impl Default for SessionLifecycle {
    fn default() -> Self {
        Self::new(QuizConfig::default())
    }
}
