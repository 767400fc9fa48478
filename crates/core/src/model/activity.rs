use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::SessionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Assessment,
    Quiz,
    Other,
}

impl ActivityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assessment => "assessment",
            Self::Quiz => "quiz",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "assessment" => Self::Assessment,
            "quiz" => Self::Quiz,
            _ => Self::Other,
        }
    }

    /// Whether the record carries a score worth charting.
    #[must_use]
    pub fn is_scored(self) -> bool {
        matches!(self, Self::Assessment | Self::Quiz)
    }
}

impl From<SessionKind> for ActivityKind {
    fn from(kind: SessionKind) -> Self {
        match kind {
            SessionKind::Assessment => Self::Assessment,
            SessionKind::Quiz => Self::Quiz,
        }
    }
}

/// Append-only history entry written once per completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub kind: ActivityKind,
    pub language: String,
    pub score: u8,
    pub timestamp: DateTime<Utc>,
}

impl ActivityRecord {
    #[must_use]
    pub fn new(
        kind: ActivityKind,
        language: impl Into<String>,
        score: u8,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            language: language.into(),
            score: score.min(100),
            timestamp,
        }
    }
}
