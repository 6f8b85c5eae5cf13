//! LiveQuiz Core - session types and effect interfaces
//!
//! This crate holds everything the session lifecycle reasons about without
//! performing any I/O itself:
//!
//! - Identifiers: `AccessKey` (public, 16 lowercase hex chars) and the
//!   internal uuid-backed ids
//! - Channel naming: `{key}-server`, `{key}-client`, `{key}-chat`
//! - Records: `Session`, `Participant`, `Quiz`, `Question`
//! - The `{event, data}` wire envelope
//! - The unified `QuizError` taxonomy
//! - Effect traits for storage, pub/sub, randomness and time
//! - `QuizConfig`
//!
//! Handlers live in `livequiz-effects`; the lifecycle itself lives in
//! `livequiz-session`.

#![allow(missing_docs)]
#![forbid(unsafe_code)]

/// Session channel naming
pub mod channels;

/// Configuration loading and validation
pub mod config;

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Wire envelope
pub mod envelope;

/// Unified error handling
pub mod errors;

/// Session, quiz, question and participant identifiers
pub mod identifiers;

/// Quiz and question records
pub mod quiz;

/// Session and participant records
pub mod session;

/// Physical time values
pub mod time;

pub use channels::{ChannelKind, ChannelName, SessionChannels};
pub use config::QuizConfig;
pub use envelope::{EventEnvelope, QuestionPayload, QUESTION_EVENT};
pub use errors::{AuthorizationFailure, PublishFailure, QuizError, Result};
pub use identifiers::{AccessKey, ParticipantId, QuestionId, QuizId, SessionId};
pub use quiz::{Question, QuestionSummary, Quiz};
pub use session::{Participant, ParticipantDraft, Session, SessionPhase};
pub use time::PhysicalTime;
