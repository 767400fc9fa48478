use serde::{Deserialize, Serialize};

/// The user's current answer to a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Answer {
    /// Index into the multiple-choice option list.
    Choice { selected: usize },
    /// Submitted code plus the number of test cases passed on the last trial run.
    Code { code: String, passed_tests: u32 },
}

impl Answer {
    #[must_use]
    pub fn choice(selected: usize) -> Self {
        Self::Choice { selected }
    }

    #[must_use]
    pub fn code(code: impl Into<String>, passed_tests: u32) -> Self {
        Self::Code {
            code: code.into(),
            passed_tests,
        }
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<usize> {
        match self {
            Self::Choice { selected } => Some(*selected),
            Self::Code { .. } => None,
        }
    }
}

/// An answer paired with the question index it belongs to, as sent for evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedAnswer {
    pub question_index: usize,
    pub answer: Answer,
}
