//! Access key allocation
//!
//! Keys are 8 bytes from `RandomEffects` rendered as lowercase hex. A
//! candidate is accepted only when storage reports it unused; collisions draw
//! a fresh candidate up to a bounded number of attempts.

use livequiz_core::effects::{RandomEffects, SessionStoreEffects};
use livequiz_core::identifiers::ACCESS_KEY_BYTES;
use livequiz_core::{AccessKey, QuizConfig, QuizError, Result};

/// Allocates unused session access keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessKeyAllocator {
    max_attempts: u32,
}

impl AccessKeyAllocator {
    /// Allocator trying at most `max_attempts` candidates (at least one)
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Allocator using `allocation_attempts` from the configuration
    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(config.allocation_attempts)
    }

    /// Candidates tried before giving up
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Draw candidates until one is unused
    ///
    /// Storage errors abort allocation; they are not treated as collisions.
    pub async fn allocate<E>(&self, effects: &E) -> Result<AccessKey>
    where
        E: RandomEffects + SessionStoreEffects,
    {
        for attempt in 1..=self.max_attempts {
            let bytes: [u8; ACCESS_KEY_BYTES] = effects
                .random_bytes(ACCESS_KEY_BYTES)
                .await
                .try_into()
                .map_err(|bytes: Vec<u8>| {
                    QuizError::internal(format!(
                        "random source returned {} bytes, expected {ACCESS_KEY_BYTES}",
                        bytes.len()
                    ))
                })?;
            let candidate = AccessKey::from_bytes(bytes);

            if !effects.session_exists(&candidate).await? {
                return Ok(candidate);
            }
            tracing::debug!(access_key = %candidate, attempt, "access key collision");
        }

        tracing::warn!(attempts = self.max_attempts, "access key allocation exhausted");
        Err(QuizError::allocation_exhausted(self.max_attempts))
    }
}

impl Default for AccessKeyAllocator {
    fn default() -> Self {
        Self::from_config(&QuizConfig::default())
    }
}
