//! Quiz and question types
//!
//! Questions are owned by the quiz and ordered by an externally maintained
//! `rank`. Nothing in the session core reorders them; storage hands out the
//! ranked sequence and the progression logic indexes into it.

use crate::identifiers::{AccessKey, QuestionId, QuizId};
use serde::{Deserialize, Serialize};

/// A single quiz question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Question identifier
    pub id: QuestionId,
    /// Total-order position within the quiz (lower comes first)
    pub rank: i64,
    /// Question title shown to participants
    pub title: String,
    /// Candidate answers in display order
    pub answers: Vec<String>,
    /// Opaque content owned by the authoring side
    #[serde(default)]
    pub content: serde_json::Value,
}

impl Question {
    /// Renderable summary carried in the published `question` event
    pub fn summary(&self) -> QuestionSummary {
        QuestionSummary {
            title: self.title.clone(),
            answers: self.answers.clone(),
        }
    }
}

/// Title-with-answers rendering of a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSummary {
    /// Question title
    pub title: String,
    /// Candidate answers
    pub answers: Vec<String>,
}

/// A quiz: the session's question source and authorization scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Quiz identifier
    pub id: QuizId,
    /// Credential granted read/write on session channels
    pub access_key: AccessKey,
    /// Display title
    pub title: String,
    /// Questions in storage order (not necessarily ranked)
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Questions sorted by rank; ties keep storage order
    pub fn ordered_questions(&self) -> Vec<Question> {
        let mut questions = self.questions.clone();
        questions.sort_by_key(|q| q.rank);
        questions
    }

    /// Number of questions
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
