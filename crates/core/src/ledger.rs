use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{Answer, IndexedAnswer};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("question index {index} out of range (session has {len} questions)")]
    OutOfRange { index: usize, len: usize },
}

/// In-progress answers for one session, keyed by question index.
///
/// Holds at most one answer per index; indexes are always within
/// `0..question_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerLedger {
    question_count: usize,
    entries: BTreeMap<usize, Answer>,
}

impl AnswerLedger {
    #[must_use]
    pub fn new(question_count: usize) -> Self {
        Self {
            question_count,
            entries: BTreeMap::new(),
        }
    }

    /// Insert or replace the answer for `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::OutOfRange` if `index` is not a question of this session.
    pub fn upsert(&mut self, index: usize, answer: Answer) -> Result<Option<Answer>, LedgerError> {
        if index >= self.question_count {
            return Err(LedgerError::OutOfRange {
                index,
                len: self.question_count,
            });
        }
        Ok(self.entries.insert(index, answer))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Answer> {
        self.entries.get(&index)
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.entries.contains_key(&index)
    }

    /// Number of recorded answers (not the number of questions).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Answers in question order. Unanswered questions are simply absent.
    #[must_use]
    pub fn gather(&self) -> Vec<IndexedAnswer> {
        self.entries
            .iter()
            .map(|(index, answer)| IndexedAnswer {
                question_index: *index,
                answer: answer.clone(),
            })
            .collect()
    }
}
