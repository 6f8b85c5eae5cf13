//! Effect trait definitions
//!
//! Pure trait definitions for every side effect the session core performs.
//! This module defines **what** effects can be performed; handlers in
//! `livequiz-effects` (production) and `livequiz-testkit` (deterministic)
//! define **how**.
//!
//! Domain code is parameterized by these traits and receives the handler per
//! call, so the same lifecycle runs against a hosted pub/sub service, the
//! in-memory broker, or a recording mock.

pub mod pubsub;
pub mod random;
pub mod reliability;
pub mod storage;
pub mod supertraits;
pub mod time;

pub use pubsub::{Grant, PubSubEffects, PubSubError, PublishAck};
pub use random::RandomEffects;
pub use reliability::{BackoffStrategy, RetryPolicy};
pub use storage::{SessionStoreEffects, StorageError};
pub use supertraits::SessionEffects;
pub use time::{PhysicalTimeEffects, TimeError};
