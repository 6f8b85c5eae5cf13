//! Session channel naming
//!
//! Every session owns exactly three pub/sub channels whose names are a pure
//! function of its access key: `{key}-server` carries host events to
//! participants, `{key}-client` carries participant traffic back to the host,
//! and `{key}-chat` is the chat room.

use crate::identifiers::AccessKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffix the transport appends to a channel name for its presence channel
pub const PRESENCE_SUFFIX: &str = "-pnpres";

/// The three channels of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Server to clients
    Server,
    /// Clients to server
    Client,
    /// Participant chat
    Chat,
}

impl ChannelKind {
    /// All kinds in canonical order
    pub const ALL: [ChannelKind; 3] = [ChannelKind::Server, ChannelKind::Client, ChannelKind::Chat];

    /// Kinds widened to the quiz scope after creation
    pub const QUIZ_SCOPED: [ChannelKind; 2] = [ChannelKind::Server, ChannelKind::Client];

    /// Name suffix for this kind
    pub fn suffix(self) -> &'static str {
        match self {
            ChannelKind::Server => "server",
            ChannelKind::Client => "client",
            ChannelKind::Chat => "chat",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A named publish/subscribe topic
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelName(String);

impl ChannelName {
    /// Wrap an arbitrary channel name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the channel of `kind` for a session key
    pub fn for_session(key: &str, kind: ChannelKind) -> Self {
        Self(format!("{key}-{}", kind.suffix()))
    }

    /// Presence channel paired with this channel
    pub fn presence(&self) -> ChannelName {
        Self(format!("{}{PRESENCE_SUFFIX}", self.0))
    }

    /// Borrow the name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The channel set owned by one session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionChannels {
    /// Host to participants
    pub server: ChannelName,
    /// Participants to host
    pub client: ChannelName,
    /// Participant chat
    pub chat: ChannelName,
}

impl SessionChannels {
    /// Derive channel names from a raw key string
    pub fn derive(key: &str) -> Self {
        Self {
            server: ChannelName::for_session(key, ChannelKind::Server),
            client: ChannelName::for_session(key, ChannelKind::Client),
            chat: ChannelName::for_session(key, ChannelKind::Chat),
        }
    }

    /// Channel names for a session access key
    pub fn for_key(key: &AccessKey) -> Self {
        Self::derive(key.as_str())
    }

    /// Channel of a given kind
    pub fn get(&self, kind: ChannelKind) -> &ChannelName {
        match kind {
            ChannelKind::Server => &self.server,
            ChannelKind::Client => &self.client,
            ChannelKind::Chat => &self.chat,
        }
    }

    /// All channels in `Server, Client, Chat` order
    pub fn iter(&self) -> impl Iterator<Item = (ChannelKind, &ChannelName)> {
        ChannelKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_derived_from_key() {
        let channels = SessionChannels::derive("abc123");
        assert_eq!(channels.server.as_str(), "abc123-server");
        assert_eq!(channels.client.as_str(), "abc123-client");
        assert_eq!(channels.chat.as_str(), "abc123-chat");
    }

    #[test]
    fn iteration_order_is_server_client_chat() {
        let channels = SessionChannels::derive("k");
        let names: Vec<_> = channels.iter().map(|(_, c)| c.as_str().to_string()).collect();
        assert_eq!(names, vec!["k-server", "k-client", "k-chat"]);
    }

    #[test]
    fn presence_channel_uses_transport_suffix() {
        let channel = ChannelName::for_session("abc123", ChannelKind::Server);
        assert_eq!(channel.presence().as_str(), "abc123-server-pnpres");
    }
}
