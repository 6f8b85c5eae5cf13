//! End-to-end session behavior against deterministic effects

use assert_matches::assert_matches;
use livequiz_core::effects::{Grant, SessionStoreEffects};
use livequiz_core::{AccessKey, QuizError, SessionPhase, QUESTION_EVENT};
use livequiz_session::{Advance, SessionLifecycle};
use livequiz_testkit::{blank_draft, participant_drafts, MockEffects, QuizBuilder};
use serde_json::json;

async fn started(questions: usize) -> (MockEffects, SessionLifecycle, AccessKey) {
    let effects = MockEffects::deterministic();
    let quiz = QuizBuilder::new("flow").questions(questions).build();
    effects.insert_quiz(quiz.clone()).await;
    let lifecycle = SessionLifecycle::default();
    let key = lifecycle
        .open(&effects, Some(&quiz), participant_drafts(3))
        .await
        .unwrap()
        .session
        .access_key;
    lifecycle.start(&effects, &key).await.unwrap();
    (effects, lifecycle, key)
}

#[tokio::test]
async fn start_publishes_the_first_question() {
    let (effects, _, key) = started(3).await;

    let session = effects.load_session(&key).await.unwrap().unwrap();
    assert_eq!(session.phase, SessionPhase::Started);
    assert_eq!(session.current_question_index, Some(0));
    assert_eq!(
        session.starting_date.map(|t| t.ts_ms),
        Some(1_640_995_200_000)
    );

    let published = effects.publishes();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].channel, session.channels().server);
    assert_eq!(published[0].envelope.event, QUESTION_EVENT);
    assert_eq!(
        published[0].envelope.data,
        json!({ "question": { "title": "Q1", "answers": ["yes", "no"] } })
    );
}

#[tokio::test]
async fn advance_from_first_of_three() {
    let (effects, lifecycle, key) = started(3).await;

    let outcome = lifecycle.switch_to_next(&effects, &key).await.unwrap();
    assert_eq!(outcome, Advance::Advanced(1));

    let session = effects.load_session(&key).await.unwrap().unwrap();
    assert_eq!(session.current_question_index, Some(1));
    let published = effects.publishes();
    assert_eq!(published.len(), 2);
    assert_eq!(
        published[1].envelope.question_payload().unwrap().question.title,
        "Q2"
    );
}

#[tokio::test]
async fn advance_past_the_last_question_finishes() {
    let (effects, lifecycle, key) = started(3).await;
    lifecycle.switch_to_next(&effects, &key).await.unwrap();
    lifecycle.switch_to_next(&effects, &key).await.unwrap();
    let publishes_before = effects.publish_attempts();

    let outcome = lifecycle.switch_to_next(&effects, &key).await.unwrap();
    assert_eq!(outcome, Advance::QuizFinished);

    let session = effects.load_session(&key).await.unwrap().unwrap();
    assert_eq!(session.current_question_index, Some(2));
    assert!(session.is_finished(3));
    assert_eq!(effects.publish_attempts(), publishes_before);
}

#[tokio::test]
async fn switch_before_start_is_not_started() {
    let effects = MockEffects::deterministic();
    let quiz = QuizBuilder::new("early").questions(2).build();
    effects.insert_quiz(quiz.clone()).await;
    let lifecycle = SessionLifecycle::default();
    let opened = lifecycle
        .open(&effects, Some(&quiz), participant_drafts(1))
        .await
        .unwrap();

    let err = lifecycle
        .switch_to_next(&effects, &opened.session.access_key)
        .await
        .unwrap_err();
    assert_matches!(err, QuizError::NotStarted { .. });

    let stored = effects
        .load_session(&opened.session.access_key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, opened.session);
    assert_eq!(effects.publish_attempts(), 0);
}

#[tokio::test]
async fn zero_participants_touch_nothing() {
    let effects = MockEffects::deterministic();
    let quiz = QuizBuilder::new("empty roster").questions(1).build();
    effects.insert_quiz(quiz.clone()).await;
    let lifecycle = SessionLifecycle::default();

    for drafts in [Vec::new(), vec![blank_draft(), blank_draft()]] {
        let err = lifecycle.open(&effects, Some(&quiz), drafts).await.unwrap_err();
        assert_matches!(err, QuizError::Validation { .. });
    }

    assert_eq!(effects.store().session_count().await, 0);
    assert_eq!(effects.grant_attempts(), 0);
    assert_eq!(effects.publish_attempts(), 0);
}

#[tokio::test]
async fn blank_drafts_are_dropped() {
    let effects = MockEffects::deterministic();
    let quiz = QuizBuilder::new("mixed roster").questions(1).build();
    effects.insert_quiz(quiz.clone()).await;

    let mut drafts = participant_drafts(2);
    drafts.insert(1, blank_draft());
    let opened = SessionLifecycle::default()
        .open(&effects, Some(&quiz), drafts)
        .await
        .unwrap();
    assert_eq!(opened.session.participants.len(), 2);
}

#[tokio::test]
async fn destroy_locks_three_channels_and_removes_participants() {
    let (effects, lifecycle, key) = started(2).await;
    effects.clear_logs();

    let report = lifecycle.destroy(&effects, &key).await.unwrap();
    assert_eq!(report.participants_removed, 3);
    assert!(report.authorization.is_complete());

    let grants = effects.grants();
    assert_eq!(grants.len(), 3);
    assert!(grants.iter().all(Grant::is_lockdown));

    let stored = effects.load_session(&key).await.unwrap().unwrap();
    assert_eq!(stored.phase, SessionPhase::Destroyed);
    assert!(stored.participants.is_empty());
}

#[tokio::test]
async fn destroy_unknown_key_is_not_found() {
    let effects = MockEffects::deterministic();
    let err = SessionLifecycle::default()
        .destroy(&effects, &AccessKey::from_bytes([0xee; 8]))
        .await
        .unwrap_err();
    assert_matches!(err, QuizError::NotFound { .. });
    assert_eq!(effects.grant_attempts(), 0);
}

#[tokio::test]
async fn creation_authorizes_quiz_scope_after_lockdown() {
    let effects = MockEffects::deterministic();
    let quiz = QuizBuilder::new("grants").questions(1).build();
    effects.insert_quiz(quiz.clone()).await;
    let opened = SessionLifecycle::default()
        .open(&effects, Some(&quiz), participant_drafts(1))
        .await
        .unwrap();

    let grants = effects.grants();
    assert_eq!(grants.len(), 5);
    assert!(grants[..3].iter().all(Grant::is_lockdown));
    assert!(grants[3..]
        .iter()
        .all(|g| g.auth_key.as_ref() == Some(&quiz.access_key) && g.read && g.write));
    assert!(opened.authorization.is_complete());
}
