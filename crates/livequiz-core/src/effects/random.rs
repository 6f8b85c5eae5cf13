//! Randomness effect interface
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `livequiz-effects` (OS CSPRNG), `livequiz-testkit` (seeded)
//! - **Usage**: Access key allocation, internal identifiers
//!
//! Access keys double as authorization scopes, so production handlers must
//! draw from a cryptographically strong source.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Source of random bytes
#[async_trait]
pub trait RandomEffects: Send + Sync {
    /// Fill a fresh buffer of `len` random bytes
    async fn random_bytes(&self, len: usize) -> Vec<u8>;

    /// Random 64-bit value
    async fn random_u64(&self) -> u64 {
        let bytes = self.random_bytes(8).await;
        let mut buf = [0u8; 8];
        buf.iter_mut().zip(bytes).for_each(|(dst, src)| *dst = src);
        u64::from_le_bytes(buf)
    }

    /// Random v4 UUID
    async fn random_uuid(&self) -> Uuid {
        let bytes = self.random_bytes(16).await;
        let mut buf = [0u8; 16];
        buf.iter_mut().zip(bytes).for_each(|(dst, src)| *dst = src);
        uuid::Builder::from_random_bytes(buf).into_uuid()
    }
}

/// Blanket implementation for Arc<T> where T: RandomEffects
#[async_trait]
impl<T: RandomEffects + ?Sized> RandomEffects for Arc<T> {
    async fn random_bytes(&self, len: usize) -> Vec<u8> {
        (**self).random_bytes(len).await
    }

    async fn random_u64(&self) -> u64 {
        (**self).random_u64().await
    }

    async fn random_uuid(&self) -> Uuid {
        (**self).random_uuid().await
    }
}
