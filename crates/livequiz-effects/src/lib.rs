//! LiveQuiz Effects - effect handlers
//!
//! Implementations of the effect traits declared in `livequiz-core`:
//!
//! - `RealRandomHandler`: operating-system randomness
//! - `RealTimeHandler`: system clock and tokio timers
//! - `MemorySessionStore`: in-memory sessions and quizzes
//! - `InMemoryPubSub`: in-process broker enforcing channel grants
//! - `LiveQuizEffects`: all of the above behind one value
//!
//! Deterministic and fault-injecting handlers live in `livequiz-testkit`.

#![allow(missing_docs)]
#![forbid(unsafe_code)]

pub mod composite;
pub mod pubsub;
pub mod random;
pub mod storage;
pub mod time;

pub use composite::LiveQuizEffects;
pub use pubsub::{InMemoryPubSub, Published};
pub use random::RealRandomHandler;
pub use storage::MemorySessionStore;
pub use time::RealTimeHandler;
