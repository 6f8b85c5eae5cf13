//! The production bundle routes every trait to its handler

use livequiz_core::effects::{
    Grant, PhysicalTimeEffects, PubSubEffects, RandomEffects, SessionStoreEffects,
};
use livequiz_core::{AccessKey, EventEnvelope, SessionChannels};
use livequiz_effects::LiveQuizEffects;

#[tokio::test]
async fn random_bytes_have_requested_length() {
    let effects = LiveQuizEffects::in_memory();
    assert_eq!(effects.random_bytes(8).await.len(), 8);
    assert_ne!(effects.random_uuid().await, effects.random_uuid().await);
}

#[tokio::test]
async fn clock_is_monotone_enough() {
    let effects = LiveQuizEffects::in_memory();
    let first = effects.physical_time().await.unwrap();
    effects.sleep_ms(2).await.unwrap();
    let second = effects.physical_time().await.unwrap();
    assert!(second.ts_ms >= first.ts_ms);
}

#[tokio::test]
async fn grants_through_the_bundle_reach_the_broker() {
    let effects = LiveQuizEffects::in_memory();
    let key = AccessKey::from_bytes([0xab; 8]);
    let auth = AccessKey::from_bytes([0xcd; 8]);
    let channels = SessionChannels::for_key(&key);

    effects
        .grant(&Grant::read_write(channels.server.clone(), auth.clone()))
        .await
        .unwrap();
    let envelope = EventEnvelope::new("question", &serde_json::json!({})).unwrap();
    let ack = effects
        .publish(&channels.server, &envelope, Some(&auth))
        .await
        .unwrap();

    assert_eq!(ack.channel, channels.server);
    assert_eq!(effects.pubsub().history(&channels.server).await.len(), 1);
    assert!(!effects.session_exists(&key).await.unwrap());
    assert_eq!(effects.store().session_count().await, 0);
}
