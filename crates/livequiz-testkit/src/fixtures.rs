//! Quiz and roster fixtures
//!
//! Ids are derived from a counter so fixtures are stable across runs.

use livequiz_core::{AccessKey, ParticipantDraft, Question, QuestionId, Quiz, QuizId};
use uuid::Uuid;

/// Builder for test quizzes
#[derive(Debug, Clone)]
pub struct QuizBuilder {
    id: QuizId,
    access_key: AccessKey,
    title: String,
    questions: Vec<Question>,
}

impl QuizBuilder {
    /// Empty quiz with a fixed id and credential
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: QuizId::from_uuid(Uuid::from_u128(0x51)),
            access_key: AccessKey::from_bytes([0x0a; 8]),
            title: title.into(),
            questions: Vec::new(),
        }
    }

    /// Override the quiz id
    pub fn id(mut self, id: u128) -> Self {
        self.id = QuizId::from_uuid(Uuid::from_u128(id));
        self
    }

    /// Override the quiz credential
    pub fn access_key(mut self, key: AccessKey) -> Self {
        self.access_key = key;
        self
    }

    /// Append a question at `rank`
    pub fn question(mut self, rank: i64, title: impl Into<String>, answers: &[&str]) -> Self {
        let n = self.questions.len() as u128 + 1;
        self.questions.push(Question {
            id: QuestionId::from_uuid(Uuid::from_u128((self.id.uuid().as_u128() << 16) + n)),
            rank,
            title: title.into(),
            answers: answers.iter().map(|a| (*a).to_string()).collect(),
            content: serde_json::Value::Null,
        });
        self
    }

    /// Append `count` questions titled `Q1..` with ascending ranks
    pub fn questions(mut self, count: usize) -> Self {
        for i in 1..=count {
            let rank = (self.questions.len() as i64 + 1) * 10;
            self = self.question(rank, format!("Q{i}"), &["yes", "no"]);
        }
        self
    }

    /// Finish the quiz
    pub fn build(self) -> Quiz {
        Quiz {
            id: self.id,
            access_key: self.access_key,
            title: self.title,
            questions: self.questions,
        }
    }
}

/// `count` non-blank participant drafts
pub fn participant_drafts(count: usize) -> Vec<ParticipantDraft> {
    (1..=count)
        .map(|i| ParticipantDraft::new(format!("Player {i}"), format!("player{i}@example.org")))
        .collect()
}

/// A blank draft, as produced by an empty form row
pub fn blank_draft() -> ParticipantDraft {
    ParticipantDraft::new("", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assigns_ascending_ranks() {
        let quiz = QuizBuilder::new("t").questions(3).build();
        let ranks: Vec<_> = quiz.questions.iter().map(|q| q.rank).collect();
        assert_eq!(ranks, vec![10, 20, 30]);
        assert_eq!(quiz.questions[2].title, "Q3");
    }

    #[test]
    fn question_ids_are_distinct() {
        let quiz = QuizBuilder::new("t").questions(4).build();
        let mut ids: Vec<_> = quiz.questions.iter().map(|q| q.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn drafts_are_not_blank() {
        assert!(participant_drafts(3).iter().all(|d| !d.is_blank()));
        assert!(blank_draft().is_blank());
    }
}
