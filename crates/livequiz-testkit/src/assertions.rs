//! Assertions over broker state

use livequiz_core::{AccessKey, ChannelKind, SessionChannels};
use livequiz_effects::InMemoryPubSub;

/// Assert nobody can read or write any of the session's channels
pub async fn assert_session_locked(broker: &InMemoryPubSub, channels: &SessionChannels, auth_key: &AccessKey) {
    for (kind, channel) in channels.iter() {
        assert_eq!(
            broker.can_access(channel, None).await,
            (false, false),
            "{kind} channel open to anonymous clients"
        );
        assert_eq!(
            broker.can_access(channel, Some(auth_key)).await,
            (false, false),
            "{kind} channel still open to the quiz credential"
        );
    }
}

/// Assert the quiz credential has full access to server and client, and only
/// the quiz credential
pub async fn assert_quiz_scope_open(broker: &InMemoryPubSub, channels: &SessionChannels, auth_key: &AccessKey) {
    for kind in ChannelKind::QUIZ_SCOPED {
        let channel = channels.get(kind);
        assert_eq!(
            broker.can_access(channel, Some(auth_key)).await,
            (true, true),
            "{kind} channel not granted to the quiz credential"
        );
        assert_eq!(
            broker.can_access(&channel.presence(), Some(auth_key)).await,
            (true, true),
            "{kind} presence channel not granted"
        );
        assert_eq!(
            broker.can_access(channel, None).await,
            (false, false),
            "{kind} channel open to anonymous clients"
        );
    }
    assert_eq!(
        broker.can_access(&channels.chat, Some(auth_key)).await,
        (false, false),
        "chat channel must stay locked"
    );
}
