//! Identifier types for sessions, quizzes, questions and participants
//!
//! `AccessKey` is the only identifier that leaves the process: it names the
//! session publicly and scopes its channels. The uuid-backed ids are internal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Number of random bytes behind an access key
pub const ACCESS_KEY_BYTES: usize = 8;

/// Length of the hex-encoded access key
pub const ACCESS_KEY_LEN: usize = ACCESS_KEY_BYTES * 2;

/// Error returned when a string is not a well-formed access key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid access key {value:?}: expected {ACCESS_KEY_LEN} lowercase hex characters")]
pub struct InvalidAccessKey {
    /// The rejected input
    pub value: String,
}

/// Public, unguessable token naming a session and its channel set
///
/// Always exactly 16 lowercase hex characters. Quizzes carry an access key as
/// well; a quiz key is used as the authorization credential on session channels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessKey(String);

impl AccessKey {
    /// Build a key from raw random bytes
    pub fn from_bytes(bytes: [u8; ACCESS_KEY_BYTES]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Parse and validate a key
    pub fn parse(value: &str) -> Result<Self, InvalidAccessKey> {
        let well_formed = value.len() == ACCESS_KEY_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(value.to_string()))
        } else {
            Err(InvalidAccessKey {
                value: value.to_string(),
            })
        }
    }

    /// Borrow the key string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccessKey {
    type Err = InvalidAccessKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccessKey {
    type Error = InvalidAccessKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccessKey> for String {
    fn from(key: AccessKey) -> Self {
        key.0
    }
}

impl AsRef<str> for AccessKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Internal session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Quiz identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuizId(pub Uuid);

impl QuizId {
    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quiz-{}", self.0)
    }
}

/// Question identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub Uuid);

impl QuestionId {
    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "question-{}", self.0)
    }
}

/// Participant identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "participant-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_key_from_bytes_is_lowercase_hex() {
        let key = AccessKey::from_bytes([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x0a, 0xff]);
        assert_eq!(key.as_str(), "deadbeef00010aff");
        assert_eq!(key.as_str().len(), ACCESS_KEY_LEN);
    }

    #[test]
    fn access_key_parse_rejects_malformed_input() {
        assert!(AccessKey::parse("deadbeef00010aff").is_ok());
        assert!(AccessKey::parse("DEADBEEF00010AFF").is_err());
        assert!(AccessKey::parse("deadbeef").is_err());
        assert!(AccessKey::parse("deadbeef00010afg").is_err());
        assert!(AccessKey::parse("").is_err());
    }

    #[test]
    fn access_key_serde_validates() {
        let key: AccessKey = serde_json::from_str("\"0123456789abcdef\"").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"0123456789abcdef\"");
        assert!(serde_json::from_str::<AccessKey>("\"not-a-key\"").is_err());
    }
}
