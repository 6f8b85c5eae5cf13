//! Channel authorization
//!
//! Applies access grants to a session's channels. Every grant is issued
//! independently and concurrently; one channel failing never prevents the
//! others from being attempted, and each outcome is reported on its own.
//!
//! Grants are idempotent on the transport, so transient failures are retried
//! under the configured `RetryPolicy`. A grant that succeeds on its first try
//! results in exactly one transport call.

use futures::future::join_all;
use livequiz_core::effects::{Grant, PubSubEffects, PubSubError, RetryPolicy};
use livequiz_core::{
    AuthorizationFailure, ChannelKind, ChannelName, QuizConfig, Session, SessionChannels,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of one grant call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelGrantOutcome {
    /// Channel the grant targeted
    pub channel: ChannelName,
    /// Which session channel it is
    pub kind: ChannelKind,
    /// Whether the grant was applied
    pub result: Result<(), AuthorizationFailure>,
}

/// Per-channel outcomes of an authorization step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationReport {
    /// One entry per grant issued, in issue order
    pub outcomes: Vec<ChannelGrantOutcome>,
}

impl AuthorizationReport {
    /// True when every grant was applied
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Failed grants
    pub fn failures(&self) -> impl Iterator<Item = &AuthorizationFailure> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// Channels whose grant was applied
    pub fn granted_channels(&self) -> impl Iterator<Item = &ChannelName> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| &o.channel)
    }

    /// Append another step's outcomes
    pub fn extend(&mut self, other: AuthorizationReport) {
        self.outcomes.extend(other.outcomes);
    }
}

/// Issues lock-down and quiz-scope grants on session channels
#[derive(Debug, Clone)]
pub struct ChannelAuthorizationManager {
    grant_timeout: Duration,
    retry: RetryPolicy,
}

impl ChannelAuthorizationManager {
    /// Manager bounding each grant by `grant_timeout` and retrying per `retry`
    pub fn new(grant_timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            grant_timeout,
            retry,
        }
    }

    /// Manager configured from `QuizConfig`
    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(config.grant_timeout(), config.grant_retry_policy())
    }

    /// Deny read and write on all three session channels
    pub async fn lock_all<E: PubSubEffects>(&self, effects: &E, session: &Session) -> AuthorizationReport {
        let channels = session.channels();
        let grants = ChannelKind::ALL
            .into_iter()
            .map(|kind| (kind, Grant::deny_all(channels.get(kind).clone())));
        let report = self.apply(effects, grants).await;
        tracing::debug!(
            access_key = %session.access_key,
            complete = report.is_complete(),
            "session channels locked"
        );
        report
    }

    /// Grant the quiz credential read, write and presence on the server and
    /// client channels. The chat channel is left as it is.
    pub async fn authorize_quiz_scope<E: PubSubEffects>(
        &self,
        effects: &E,
        session: &Session,
    ) -> AuthorizationReport {
        let channels: SessionChannels = session.channels();
        let auth_key = session.auth_key();
        let grants = ChannelKind::QUIZ_SCOPED
            .into_iter()
            .map(|kind| (kind, Grant::read_write(channels.get(kind).clone(), auth_key.clone())));
        let report = self.apply(effects, grants).await;
        tracing::debug!(
            access_key = %session.access_key,
            complete = report.is_complete(),
            "quiz scope authorized"
        );
        report
    }

    async fn apply<E, I>(&self, effects: &E, grants: I) -> AuthorizationReport
    where
        E: PubSubEffects,
        I: IntoIterator<Item = (ChannelKind, Grant)>,
    {
        let outcomes = join_all(
            grants
                .into_iter()
                .map(|(kind, grant)| self.apply_one(effects, kind, grant)),
        )
        .await;
        AuthorizationReport { outcomes }
    }

    async fn apply_one<E: PubSubEffects>(
        &self,
        effects: &E,
        kind: ChannelKind,
        grant: Grant,
    ) -> ChannelGrantOutcome {
        let bound = self.grant_timeout;
        let timeout_ms = u64::try_from(bound.as_millis()).unwrap_or(u64::MAX);
        let pending = &grant;
        let result = self
            .retry
            .execute_when(
                move || async move {
                    match tokio::time::timeout(bound, effects.grant(pending)).await {
                        Ok(result) => result,
                        Err(_) => Err(PubSubError::Timeout {
                            operation: "grant".to_string(),
                            timeout_ms,
                        }),
                    }
                },
                PubSubError::is_retryable,
            )
            .await
            .map_err(|err| err.into_authorization_failure(&grant.channel));

        if let Err(failure) = &result {
            tracing::warn!(
                channel = %grant.channel,
                retryable = failure.retryable,
                reason = %failure.reason,
                "channel grant failed"
            );
        }

        ChannelGrantOutcome {
            channel: grant.channel,
            kind,
            result,
        }
    }
}

impl Default for ChannelAuthorizationManager {
    fn default() -> Self {
        Self::from_config(&QuizConfig::default())
    }
}
