use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{EvaluationResult, SessionConfig};

/// Identifier of a stored session result.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResultId(i64);

impl ResultId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResultId({})", self.0)
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A completed session's evaluation, as kept by the result store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResult {
    pub id: ResultId,
    pub config: SessionConfig,
    pub result: EvaluationResult,
    pub completed_at: DateTime<Utc>,
}

/// A result that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStoredResult {
    pub config: SessionConfig,
    pub result: EvaluationResult,
    pub completed_at: DateTime<Utc>,
}

impl NewStoredResult {
    #[must_use]
    pub fn with_id(self, id: ResultId) -> StoredResult {
        StoredResult {
            id,
            config: self.config,
            result: self.result,
            completed_at: self.completed_at,
        }
    }
}
