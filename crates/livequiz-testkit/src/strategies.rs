//! Property test strategies for LiveQuiz types

use livequiz_core::{AccessKey, Question, QuestionId, Quiz, QuizId};
use proptest::prelude::*;
use uuid::Uuid;

// Re-export proptest for convenience
pub use proptest;

/// Arbitrary well-formed access key
pub fn arb_access_key() -> impl Strategy<Value = AccessKey> {
    any::<[u8; 8]>().prop_map(AccessKey::from_bytes)
}

/// Quiz with between `min` and `max` questions at arbitrary distinct ranks
pub fn arb_quiz(min: usize, max: usize) -> impl Strategy<Value = Quiz> {
    prop::collection::btree_set(-1_000i64..1_000, min..=max).prop_flat_map(|ranks| {
        let ranks: Vec<i64> = ranks.into_iter().collect();
        Just(ranks).prop_shuffle().prop_map(|ranks| Quiz {
            id: QuizId::from_uuid(Uuid::from_u128(0x77)),
            access_key: AccessKey::from_bytes([0x0b; 8]),
            title: "arbitrary".to_string(),
            questions: ranks
                .into_iter()
                .enumerate()
                .map(|(i, rank)| Question {
                    id: QuestionId::from_uuid(Uuid::from_u128(i as u128 + 1)),
                    rank,
                    title: format!("rank {rank}"),
                    answers: vec!["a".to_string(), "b".to_string()],
                    content: serde_json::Value::Null,
                })
                .collect(),
        })
    })
}
