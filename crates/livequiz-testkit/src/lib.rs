//! LiveQuiz Testing Infrastructure
//!
//! Shared setup for session tests: a deterministic effect bundle with fault
//! injection, quiz and roster fixtures, proptest strategies and a few
//! assertions over broker state.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! livequiz-testkit = { path = "../livequiz-testkit" }
//! ```
//!
//! ```rust,no_run
//! use livequiz_testkit::*;
//!
//! # async fn demo() {
//! let effects = MockEffects::deterministic();
//! let quiz = QuizBuilder::new("Capitals").questions(3).build();
//! effects.insert_quiz(quiz).await;
//! # }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(missing_docs)]

pub mod assertions;
pub mod fixtures;
pub mod mock_effects;
pub mod strategies;

pub use assertions::*;
pub use fixtures::*;
pub use mock_effects::{Fault, MockEffects, PublishRecord};

/// Install a test subscriber honouring `RUST_LOG`; safe to call repeatedly
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
