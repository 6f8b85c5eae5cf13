//! Property tests for access keys and channel derivation

use livequiz_core::identifiers::ACCESS_KEY_LEN;
use livequiz_core::{AccessKey, ChannelKind, SessionChannels};
use proptest::prelude::*;

proptest! {
    #[test]
    fn keys_from_bytes_are_sixteen_lowercase_hex(bytes in any::<[u8; 8]>()) {
        let key = AccessKey::from_bytes(bytes);
        prop_assert_eq!(key.as_str().len(), ACCESS_KEY_LEN);
        prop_assert!(key.as_str().bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        prop_assert_eq!(AccessKey::parse(key.as_str()), Ok(key.clone()));
    }

    #[test]
    fn distinct_bytes_give_distinct_keys(a in any::<[u8; 8]>(), b in any::<[u8; 8]>()) {
        prop_assume!(a != b);
        prop_assert_ne!(AccessKey::from_bytes(a), AccessKey::from_bytes(b));
    }

    #[test]
    fn channel_names_are_pure_functions_of_the_key(bytes in any::<[u8; 8]>()) {
        let key = AccessKey::from_bytes(bytes);
        let first = SessionChannels::for_key(&key);
        let second = SessionChannels::derive(key.as_str());
        prop_assert_eq!(&first, &second);
        for (kind, channel) in first.iter() {
            prop_assert_eq!(channel.as_str(), format!("{}-{}", key, kind.suffix()));
        }
    }

    #[test]
    fn parse_rejects_wrong_lengths(s in "[0-9a-f]{0,15}|[0-9a-f]{17,32}") {
        prop_assert!(AccessKey::parse(&s).is_err());
    }
}

#[test]
fn chat_is_not_quiz_scoped() {
    assert!(!ChannelKind::QUIZ_SCOPED.contains(&ChannelKind::Chat));
    assert_eq!(ChannelKind::ALL.len(), 3);
}
