//! Question progression
//!
//! Pure index arithmetic over a ranked question list. Callers supply the
//! ordered sequence; nothing here reorders or stores anything.

use livequiz_core::Question;

/// Stateless progression rules
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionProgression;

impl QuestionProgression {
    /// Question at `index`, if an index is set and in bounds
    pub fn current(questions: &[Question], index: Option<usize>) -> Option<&Question> {
        index.and_then(|i| questions.get(i))
    }

    /// Next index, or `None` when `index` is already the last question
    pub fn advance(index: usize, question_count: usize) -> Option<usize> {
        let next = index.checked_add(1)?;
        (next < question_count).then_some(next)
    }

    /// Index of the first question, if there is one
    pub fn first(question_count: usize) -> Option<usize> {
        (question_count > 0).then_some(0)
    }

    /// Questions left after `index`
    pub fn remaining(index: usize, question_count: usize) -> usize {
        question_count.saturating_sub(index.saturating_add(1))
    }
}
