use serde::{Deserialize, Serialize};

use crate::timer::TimeLimit;

//
// ─── TEST CASES ────────────────────────────────────────────────────────────────
//

/// A single input/expected-output pair attached to a programming question.
///
/// Hidden cases are sent to the trial run like the visible ones, but the UI
/// only shows the sample (non-hidden) cases to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    #[serde(default)]
    pub is_hidden: bool,
}

impl TestCase {
    #[must_use]
    pub fn sample(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
            is_hidden: false,
        }
    }

    #[must_use]
    pub fn hidden(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
            is_hidden: true,
        }
    }
}

//
// ─── QUESTION VARIANTS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoiceQuestion {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgrammingQuestion {
    pub question: String,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub starter_code: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

impl ProgrammingQuestion {
    /// Test cases the user is allowed to see.
    pub fn sample_cases(&self) -> impl Iterator<Item = &TestCase> {
        self.test_cases.iter().filter(|case| !case.is_hidden)
    }
}

/// Discriminant of [`Question`], handy for display and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    MultipleChoice,
    Programming,
}

/// A generated question. Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Question {
    MultipleChoice(MultipleChoiceQuestion),
    Programming(ProgrammingQuestion),
}

impl Question {
    #[must_use]
    pub fn multiple_choice<I, S>(question: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MultipleChoice(MultipleChoiceQuestion {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
        })
    }

    #[must_use]
    pub fn programming(
        question: impl Into<String>,
        starter_code: impl Into<String>,
        test_cases: Vec<TestCase>,
    ) -> Self {
        Self::Programming(ProgrammingQuestion {
            question: question.into(),
            constraints: Vec::new(),
            starter_code: starter_code.into(),
            test_cases,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        match self {
            Self::MultipleChoice(q) => &q.question,
            Self::Programming(q) => &q.question,
        }
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::MultipleChoice(_) => QuestionKind::MultipleChoice,
            Self::Programming(_) => QuestionKind::Programming,
        }
    }

    #[must_use]
    pub fn is_programming(&self) -> bool {
        matches!(self, Self::Programming(_))
    }

    /// Per-question countdown duration.
    #[must_use]
    pub fn time_limit(&self) -> TimeLimit {
        match self {
            Self::MultipleChoice(_) => TimeLimit::MULTIPLE_CHOICE,
            Self::Programming(_) => TimeLimit::PROGRAMMING,
        }
    }

    #[must_use]
    pub fn as_programming(&self) -> Option<&ProgrammingQuestion> {
        match self {
            Self::Programming(q) => Some(q),
            Self::MultipleChoice(_) => None,
        }
    }

    #[must_use]
    pub fn as_multiple_choice(&self) -> Option<&MultipleChoiceQuestion> {
        match self {
            Self::MultipleChoice(q) => Some(q),
            Self::Programming(_) => None,
        }
    }
}
