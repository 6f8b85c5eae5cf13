//! Wire envelope sent over the session server channel

use crate::errors::Result;
use crate::quiz::QuestionSummary;
use serde::{Deserialize, Serialize};

/// Event name used for question delivery
pub const QUESTION_EVENT: &str = "question";

/// `{event, data}` message published on a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Event name
    pub event: String,
    /// Event payload
    pub data: serde_json::Value,
}

/// Payload of a question event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPayload {
    /// Rendered question
    pub question: QuestionSummary,
}

impl EventEnvelope {
    /// Envelope with a serializable payload
    pub fn new<T: Serialize>(event: impl Into<String>, data: &T) -> Result<Self> {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_value(data)?,
        })
    }

    /// `{event, data: {question}}` envelope for a question
    pub fn question(event: impl Into<String>, question: QuestionSummary) -> Result<Self> {
        Self::new(event, &QuestionPayload { question })
    }

    /// Decode the question payload, if this is a question envelope
    pub fn question_payload(&self) -> Option<QuestionPayload> {
        serde_json::from_value(self.data.clone()).ok()
    }

    /// Serialize to the JSON wire form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
