//! Event publishing
//!
//! Sends `{event, data}` envelopes and waits for the transport to confirm,
//! bounded by the configured publish timeout. The publisher never retries:
//! after an ambiguous timeout the envelope may already have been delivered.

use livequiz_core::effects::{PubSubEffects, PublishAck};
use livequiz_core::{
    AccessKey, ChannelName, EventEnvelope, PublishFailure, Question, QuizConfig, Session,
};
use std::time::Duration;

/// Confirmed publisher for session channels
#[derive(Debug, Clone)]
pub struct EventPublisher {
    timeout: Duration,
    question_event: String,
}

impl EventPublisher {
    /// Publisher waiting at most `timeout` per envelope
    pub fn new(timeout: Duration, question_event: impl Into<String>) -> Self {
        Self {
            timeout,
            question_event: question_event.into(),
        }
    }

    /// Publisher configured from `QuizConfig`
    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(config.publish_timeout(), config.question_event.clone())
    }

    /// Publish `envelope` on `channel` and wait for the acknowledgement
    pub async fn publish<E: PubSubEffects>(
        &self,
        effects: &E,
        channel: &ChannelName,
        envelope: &EventEnvelope,
        auth_key: Option<&AccessKey>,
    ) -> Result<PublishAck, PublishFailure> {
        match tokio::time::timeout(self.timeout, effects.publish(channel, envelope, auth_key)).await {
            Ok(Ok(ack)) => Ok(ack),
            Ok(Err(err)) => Err(err.into_publish_failure()),
            Err(_) => Err(PublishFailure::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    /// Publish `question` on the session's server channel
    pub async fn publish_question<E: PubSubEffects>(
        &self,
        effects: &E,
        session: &Session,
        question: &Question,
    ) -> Result<PublishAck, PublishFailure> {
        let envelope = EventEnvelope::question(self.question_event.as_str(), question.summary())
            .map_err(|err| PublishFailure::Encoding {
                reason: err.to_string(),
            })?;
        let channel = session.channels().server;
        let ack = self
            .publish(effects, &channel, &envelope, Some(session.auth_key()))
            .await?;
        tracing::debug!(
            channel = %channel,
            timetoken = ack.timetoken,
            question = %question.id,
            "question published"
        );
        Ok(ack)
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::from_config(&QuizConfig::default())
    }
}
