//! In-memory pub/sub broker
//!
//! Stateless-per-call broker for simulation and tests. Enforces grants the
//! way a hosted access manager does:
//!
//! - a grant scoped to an auth key applies only to clients presenting it
//! - a client without a keyed grant falls back to the channel-wide grant
//! - no grant at all means no access
//! - a channel-wide lock-down also revokes every keyed grant on the channel
//!
//! Grants carrying a presence channel apply the same permissions there.

use async_trait::async_trait;
use livequiz_core::effects::{Grant, PubSubEffects, PubSubError, PublishAck};
use livequiz_core::{AccessKey, ChannelName, EventEnvelope};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Subscriber buffer size per channel
const DEFAULT_CAPACITY: usize = 64;

/// Envelope as seen by a subscriber
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    /// Channel the envelope was published on
    pub channel: ChannelName,
    /// Broker-assigned ordering token
    pub timetoken: u64,
    /// The envelope itself
    pub envelope: EventEnvelope,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Permission {
    read: bool,
    write: bool,
}

#[derive(Debug, Default)]
struct Broker {
    grants: HashMap<(ChannelName, Option<AccessKey>), Permission>,
    topics: HashMap<ChannelName, broadcast::Sender<Published>>,
    history: HashMap<ChannelName, Vec<Published>>,
}

impl Broker {
    fn apply(&mut self, channel: &ChannelName, grant: &Grant) {
        let permission = Permission {
            read: grant.read,
            write: grant.write,
        };
        if grant.is_lockdown() {
            self.grants.retain(|(granted, _), _| granted != channel);
        }
        self.grants
            .insert((channel.clone(), grant.auth_key.clone()), permission);
    }

    fn permission(&self, channel: &ChannelName, auth_key: Option<&AccessKey>) -> Permission {
        auth_key
            .and_then(|key| self.grants.get(&(channel.clone(), Some(key.clone()))))
            .or_else(|| self.grants.get(&(channel.clone(), None)))
            .copied()
            .unwrap_or_default()
    }

    fn sender(&mut self, channel: &ChannelName, capacity: usize) -> broadcast::Sender<Published> {
        self.topics
            .entry(channel.clone())
            .or_insert_with(|| broadcast::channel(capacity).0)
            .clone()
    }
}

/// In-memory broker implementing `PubSubEffects`
#[derive(Debug, Clone)]
pub struct InMemoryPubSub {
    broker: Arc<RwLock<Broker>>,
    timetoken: Arc<AtomicU64>,
    capacity: usize,
}

impl InMemoryPubSub {
    /// Create an empty broker
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a broker with a custom subscriber buffer
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            broker: Arc::new(RwLock::new(Broker::default())),
            timetoken: Arc::new(AtomicU64::new(0)),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to `channel` presenting `auth_key`
    pub async fn subscribe(
        &self,
        channel: &ChannelName,
        auth_key: Option<&AccessKey>,
    ) -> Result<broadcast::Receiver<Published>, PubSubError> {
        let mut broker = self.broker.write().await;
        if !broker.permission(channel, auth_key).read {
            return Err(PubSubError::Forbidden {
                channel: channel.to_string(),
                reason: "read not granted".to_string(),
            });
        }
        Ok(broker.sender(channel, self.capacity).subscribe())
    }

    /// Whether `auth_key` may currently read and write `channel`
    pub async fn can_access(&self, channel: &ChannelName, auth_key: Option<&AccessKey>) -> (bool, bool) {
        let permission = self.broker.read().await.permission(channel, auth_key);
        (permission.read, permission.write)
    }

    /// Every envelope accepted on `channel`, oldest first
    pub async fn history(&self, channel: &ChannelName) -> Vec<Published> {
        self.broker
            .read()
            .await
            .history
            .get(channel)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for InMemoryPubSub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PubSubEffects for InMemoryPubSub {
    async fn publish(
        &self,
        channel: &ChannelName,
        envelope: &EventEnvelope,
        auth_key: Option<&AccessKey>,
    ) -> Result<PublishAck, PubSubError> {
        let mut broker = self.broker.write().await;
        if !broker.permission(channel, auth_key).write {
            return Err(PubSubError::Forbidden {
                channel: channel.to_string(),
                reason: "write not granted".to_string(),
            });
        }

        let timetoken = self.timetoken.fetch_add(1, Ordering::SeqCst) + 1;
        let published = Published {
            channel: channel.clone(),
            timetoken,
            envelope: envelope.clone(),
        };
        broker
            .history
            .entry(channel.clone())
            .or_default()
            .push(published.clone());

        // No subscribers is not an error
        let _ = broker.sender(channel, self.capacity).send(published);

        tracing::trace!(channel = %channel, timetoken, event = %envelope.event, "published");
        Ok(PublishAck {
            channel: channel.clone(),
            timetoken,
        })
    }

    async fn grant(&self, grant: &Grant) -> Result<(), PubSubError> {
        let mut broker = self.broker.write().await;
        broker.apply(&grant.channel, grant);
        if let Some(presence) = &grant.presence {
            broker.apply(presence, grant);
        }
        tracing::trace!(
            channel = %grant.channel,
            read = grant.read,
            write = grant.write,
            keyed = grant.auth_key.is_some(),
            "grant applied"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn key() -> AccessKey {
        AccessKey::from_bytes([5; 8])
    }

    #[tokio::test]
    async fn default_is_deny() {
        let broker = InMemoryPubSub::new();
        let channel = ChannelName::new("k-server");
        let err = broker
            .publish(&channel, &EventEnvelope::new("ping", &json!({})).unwrap(), Some(&key()))
            .await
            .unwrap_err();
        assert_matches!(err, PubSubError::Forbidden { .. });
        assert!(broker.subscribe(&channel, None).await.is_err());
    }

    #[tokio::test]
    async fn repeated_grants_are_idempotent() {
        let broker = InMemoryPubSub::new();
        let channel = ChannelName::new("k-client");
        let open = Grant::read_write(channel.clone(), key());

        broker.grant(&open).await.unwrap();
        broker.grant(&open).await.unwrap();
        assert_eq!(broker.can_access(&channel, Some(&key())).await, (true, true));
        assert_eq!(
            broker.can_access(&channel.presence(), Some(&key())).await,
            (true, true)
        );
        assert_eq!(broker.can_access(&channel, None).await, (false, false));

        let lock = Grant::deny_all(channel.clone());
        broker.grant(&lock).await.unwrap();
        broker.grant(&lock).await.unwrap();
        assert_eq!(broker.can_access(&channel, Some(&key())).await, (false, false));
        assert_eq!(broker.can_access(&channel, None).await, (false, false));
    }

    #[tokio::test]
    async fn keyed_grant_admits_only_its_key() {
        let broker = InMemoryPubSub::new();
        let channel = ChannelName::new("k-server");
        broker.grant(&Grant::deny_all(channel.clone())).await.unwrap();
        broker
            .grant(&Grant::read_write(channel.clone(), key()))
            .await
            .unwrap();

        assert_eq!(broker.can_access(&channel, Some(&key())).await, (true, true));
        assert_eq!(broker.can_access(&channel, None).await, (false, false));
        let stranger = AccessKey::from_bytes([6; 8]);
        assert_eq!(broker.can_access(&channel, Some(&stranger)).await, (false, false));
        assert_eq!(
            broker.can_access(&channel.presence(), Some(&key())).await,
            (true, true)
        );
    }

    #[tokio::test]
    async fn lockdown_revokes_keyed_grants() {
        let broker = InMemoryPubSub::new();
        let channel = ChannelName::new("k-client");
        broker
            .grant(&Grant::read_write(channel.clone(), key()))
            .await
            .unwrap();
        broker.grant(&Grant::deny_all(channel.clone())).await.unwrap();
        assert_eq!(broker.can_access(&channel, Some(&key())).await, (false, false));
    }

    #[tokio::test]
    async fn subscribers_receive_in_timetoken_order() {
        let broker = InMemoryPubSub::new();
        let channel = ChannelName::new("k-server");
        broker
            .grant(&Grant::read_write(channel.clone(), key()))
            .await
            .unwrap();
        let mut rx = broker.subscribe(&channel, Some(&key())).await.unwrap();

        for n in 0..3 {
            let envelope = EventEnvelope::new("question", &json!({ "n": n })).unwrap();
            broker.publish(&channel, &envelope, Some(&key())).await.unwrap();
        }

        let mut last = 0;
        for n in 0..3 {
            let published = rx.recv().await.unwrap();
            assert!(published.timetoken > last);
            assert_eq!(published.envelope.data, json!({ "n": n }));
            last = published.timetoken;
        }
        assert_eq!(broker.history(&channel).await.len(), 3);
    }
}
