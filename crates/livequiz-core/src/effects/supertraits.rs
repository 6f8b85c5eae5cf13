//! Supertraits for common effect combinations

use super::{PhysicalTimeEffects, PubSubEffects, RandomEffects, SessionStoreEffects};

/// Everything the session lifecycle needs
///
/// Combines durable storage, the pub/sub transport, randomness for key
/// allocation and the clock for starting dates.
pub trait SessionEffects:
    SessionStoreEffects + PubSubEffects + RandomEffects + PhysicalTimeEffects
{
}

/// Automatic implementation for types that satisfy the required bounds
impl<T> SessionEffects for T where
    T: SessionStoreEffects + PubSubEffects + RandomEffects + PhysicalTimeEffects
{
}
