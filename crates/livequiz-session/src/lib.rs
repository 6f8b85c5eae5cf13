//! LiveQuiz Session - live quiz session lifecycle
//!
//! This crate drives a session from creation to destruction:
//!
//! - **allocator**: unique 16-hex-char access keys with bounded retries
//! - **progression**: pure index arithmetic over ranked questions
//! - **authorization**: concurrent lock-down and quiz-scope channel grants
//! - **publisher**: confirmed, bounded-time question broadcast
//! - **lifecycle**: the state machine tying the above together
//!
//! All operations take their effect handler per call; see
//! `livequiz_core::effects::SessionEffects` for what a handler must provide.

#![allow(missing_docs)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod authorization;
pub mod lifecycle;
pub mod progression;
pub mod publisher;

pub use allocator::AccessKeyAllocator;
pub use authorization::{AuthorizationReport, ChannelAuthorizationManager, ChannelGrantOutcome};
pub use lifecycle::{Advance, DestroyReport, OpenedSession, SessionLifecycle};
pub use progression::QuestionProgression;
pub use publisher::EventPublisher;
