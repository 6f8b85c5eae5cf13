//! Session and participant records
//!
//! A `Session` is one live run of a quiz. It is identified publicly by its
//! access key, owns its participants, and tracks progression through the
//! quiz's ranked questions. Phase transitions are driven by the lifecycle in
//! `livequiz-session`; this module only holds the data and its invariants.

use crate::channels::SessionChannels;
use crate::identifiers::{AccessKey, ParticipantId, QuizId, SessionId};
use crate::quiz::Question;
use crate::time::PhysicalTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Constructed with a key, channels not yet authorized
    Created,
    /// Channels locked and widened to the quiz scope
    Authorized,
    /// First question published
    Started,
    /// Participants removed and channels locked again; terminal
    Destroyed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Created => "created",
            SessionPhase::Authorized => "authorized",
            SessionPhase::Started => "started",
            SessionPhase::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// Participant roster entry as submitted by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDraft {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Contact address
    #[serde(default)]
    pub email: String,
}

impl ParticipantDraft {
    /// Draft with the given name and email
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// True when every field is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.email.trim().is_empty()
    }
}

/// A participant owned by a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant identifier
    pub id: ParticipantId,
    /// Access key of the owning session
    pub session_key: AccessKey,
    /// Display name
    pub name: String,
    /// Contact address
    pub email: String,
}

/// One live run of a quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Internal identifier, never exposed
    pub id: SessionId,
    /// Public identifier and channel scope; immutable once assigned
    pub access_key: AccessKey,
    /// Owning quiz
    pub quiz_id: QuizId,
    /// Owning quiz's access key, the authorization credential on channels
    pub quiz_auth_key: AccessKey,
    /// Current lifecycle phase
    pub phase: SessionPhase,
    /// When the session started; absent until `start`
    pub starting_date: Option<PhysicalTime>,
    /// Index into the ranked question list; absent until `start`
    pub current_question_index: Option<usize>,
    /// Participants; removed with the session
    pub participants: Vec<Participant>,
}

impl Session {
    /// Whether the session has been started
    pub fn started(&self) -> bool {
        self.starting_date.is_some()
    }

    /// Identifier used wherever an external resource token is needed
    pub fn public_id(&self) -> &AccessKey {
        &self.access_key
    }

    /// Credential used on the session channels
    pub fn auth_key(&self) -> &AccessKey {
        &self.quiz_auth_key
    }

    /// The three channels of this session
    pub fn channels(&self) -> SessionChannels {
        SessionChannels::for_key(&self.access_key)
    }

    /// Whether the session has been destroyed
    pub fn is_destroyed(&self) -> bool {
        self.phase == SessionPhase::Destroyed
    }

    /// Current question within `questions`, if started and in bounds
    pub fn current_question<'a>(&self, questions: &'a [Question]) -> Option<&'a Question> {
        self.current_question_index.and_then(|i| questions.get(i))
    }

    /// True once the last question is current
    pub fn is_finished(&self, question_count: usize) -> bool {
        match self.current_question_index {
            Some(index) if self.started() => index + 1 >= question_count,
            _ => false,
        }
    }
}
