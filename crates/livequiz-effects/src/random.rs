//! Random effect handlers
//!
//! This module provides the production implementation of the `RandomEffects`
//! trait defined in `livequiz-core`. Access keys are authorization scopes, so
//! bytes come straight from the operating system's CSPRNG.

use async_trait::async_trait;
use livequiz_core::effects::RandomEffects;
use rand::rngs::OsRng;
use rand::RngCore;

/// Real random handler using operating-system randomness
#[derive(Debug, Clone, Default)]
pub struct RealRandomHandler;

impl RealRandomHandler {
    /// Create a new real random handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RandomEffects for RealRandomHandler {
    async fn random_bytes(&self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        OsRng.fill_bytes(&mut bytes);
        bytes
    }

    async fn random_u64(&self) -> u64 {
        OsRng.next_u64()
    }
}

// Seeded handlers for tests live in livequiz-testkit
