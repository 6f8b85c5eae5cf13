//! Publish/subscribe transport effect interface
//!
//! This module defines the two operations the session core needs from a
//! hosted pub/sub service: publishing an envelope on a channel and setting
//! per-channel access grants.
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect (external collaborator)
//! - **Implementation**: `livequiz-effects::InMemoryPubSub`, or an HTTP client for
//!   a hosted service supplied by the embedding application
//! - **Usage**: Question broadcast, channel lock-down and authorization
//!
//! Grants overwrite earlier grants with the same `(channel, auth_key)` pair, so
//! issuing the same grant twice is harmless.

use crate::channels::ChannelName;
use crate::envelope::EventEnvelope;
use crate::errors::{AuthorizationFailure, PublishFailure};
use crate::identifiers::AccessKey;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Pub/sub operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum PubSubError {
    /// The service did not answer in time
    #[error("Operation '{operation}' timed out after {timeout_ms}ms")]
    Timeout {
        /// The operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },
    /// Credential rejected or channel locked
    #[error("Forbidden on {channel}: {reason}")]
    Forbidden {
        /// Channel the operation targeted
        channel: String,
        /// Reason supplied by the service
        reason: String,
    },
    /// Service unreachable or returned a transient error
    #[error("Service unavailable: {reason}")]
    Unavailable {
        /// Reason for the failure
        reason: String,
    },
    /// Payload could not be encoded
    #[error("Serialization failed: {error}")]
    Serialization {
        /// Serialization error message
        error: String,
    },
}

impl PubSubError {
    /// Whether the same call may succeed if repeated
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Unavailable { .. })
    }

    /// Classify as a publish failure
    pub fn into_publish_failure(self) -> PublishFailure {
        match self {
            Self::Timeout { timeout_ms, .. } => PublishFailure::Timeout { timeout_ms },
            Self::Forbidden { reason, .. } => PublishFailure::Rejected { reason },
            Self::Serialization { error } => PublishFailure::Encoding { reason: error },
            other => PublishFailure::Transport {
                reason: other.to_string(),
            },
        }
    }

    /// Classify as an authorization failure on `channel`
    pub fn into_authorization_failure(self, channel: &ChannelName) -> AuthorizationFailure {
        AuthorizationFailure {
            channel: channel.clone(),
            retryable: self.is_retryable(),
            reason: self.to_string(),
        }
    }
}

/// Delivery confirmation for a publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishAck {
    /// Channel the envelope was delivered to
    pub channel: ChannelName,
    /// Service-assigned ordering token
    pub timetoken: u64,
}

/// Access grant on one channel
///
/// With `auth_key` unset the grant applies to every subscriber of the
/// channel; with it set, only to clients presenting that key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    /// Target channel
    pub channel: ChannelName,
    /// Credential the grant is scoped to
    pub auth_key: Option<AccessKey>,
    /// Presence channel included in the grant
    pub presence: Option<ChannelName>,
    /// Allow subscribe
    pub read: bool,
    /// Allow publish
    pub write: bool,
}

impl Grant {
    /// Deny read and write on `channel` for everyone
    pub fn deny_all(channel: ChannelName) -> Self {
        Self {
            channel,
            auth_key: None,
            presence: None,
            read: false,
            write: false,
        }
    }

    /// Full read/write plus presence on `channel` for holders of `auth_key`
    pub fn read_write(channel: ChannelName, auth_key: AccessKey) -> Self {
        Self {
            presence: Some(channel.presence()),
            channel,
            auth_key: Some(auth_key),
            read: true,
            write: true,
        }
    }

    /// Whether this grant denies everything
    pub fn is_lockdown(&self) -> bool {
        self.auth_key.is_none() && !self.read && !self.write
    }
}

/// Pub/sub transport operations
#[async_trait]
pub trait PubSubEffects: Send + Sync {
    /// Publish `envelope` on `channel`, returning once the service confirms
    async fn publish(
        &self,
        channel: &ChannelName,
        envelope: &EventEnvelope,
        auth_key: Option<&AccessKey>,
    ) -> Result<PublishAck, PubSubError>;

    /// Apply an access grant
    async fn grant(&self, grant: &Grant) -> Result<(), PubSubError>;
}

/// Blanket implementation for Arc<T> where T: PubSubEffects
#[async_trait]
impl<T: PubSubEffects + ?Sized> PubSubEffects for Arc<T> {
    async fn publish(
        &self,
        channel: &ChannelName,
        envelope: &EventEnvelope,
        auth_key: Option<&AccessKey>,
    ) -> Result<PublishAck, PubSubError> {
        (**self).publish(channel, envelope, auth_key).await
    }

    async fn grant(&self, grant: &Grant) -> Result<(), PubSubError> {
        (**self).grant(grant).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_grant_includes_presence() {
        let key = AccessKey::from_bytes([7; 8]);
        let grant = Grant::read_write(ChannelName::new("abc-server"), key.clone());
        assert_eq!(grant.presence, Some(ChannelName::new("abc-server-pnpres")));
        assert_eq!(grant.auth_key, Some(key));
        assert!(grant.read && grant.write);
        assert!(!grant.is_lockdown());
        assert!(Grant::deny_all(ChannelName::new("abc-chat")).is_lockdown());
    }

    #[test]
    fn error_classification() {
        let timeout = PubSubError::Timeout {
            operation: "publish".into(),
            timeout_ms: 50,
        };
        assert!(timeout.is_retryable());
        assert_eq!(
            timeout.into_publish_failure(),
            PublishFailure::Timeout { timeout_ms: 50 }
        );

        let forbidden = PubSubError::Forbidden {
            channel: "abc-server".into(),
            reason: "no grant".into(),
        };
        assert!(!forbidden.is_retryable());
        let failure = forbidden.into_authorization_failure(&ChannelName::new("abc-server"));
        assert!(!failure.retryable);
        assert_eq!(failure.channel.as_str(), "abc-server");
    }
}
