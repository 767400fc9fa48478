use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("please enter a language or skill name")]
    EmptyLanguage,

    #[error("a session needs at least one question")]
    NoQuestions,

    #[error("programming questions ({programming}) exceed total questions ({total})")]
    TooManyProgramming { programming: u32, total: u32 },
}

/// Which generation call backs a session.
///
/// Assessments are static and may be focused on a topic; quizzes are generated
/// dynamically over a broader range. The session machine treats both alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Assessment,
    Quiz,
}

impl SessionKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Assessment => "Assessment",
            Self::Quiz => "Quiz",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    #[must_use]
    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parameters for one session, passed through to question generation and evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub language: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub number_of_questions: u32,
    pub number_of_programming_questions: u32,
}

impl SessionConfig {
    #[must_use]
    pub fn new(kind: SessionKind, language: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            kind,
            language: language.into(),
            difficulty,
            topic: None,
            number_of_questions: 10,
            number_of_programming_questions: 0,
        }
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        let topic = topic.into();
        self.topic = if topic.trim().is_empty() {
            None
        } else {
            Some(topic)
        };
        self
    }

    #[must_use]
    pub fn with_counts(mut self, total: u32, programming: u32) -> Self {
        self.number_of_questions = total;
        self.number_of_programming_questions = programming;
        self
    }

    /// Check user-entered values before a session is started.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.language.trim().is_empty() {
            return Err(ConfigError::EmptyLanguage);
        }
        if self.number_of_questions == 0 {
            return Err(ConfigError::NoQuestions);
        }
        if self.number_of_programming_questions > self.number_of_questions {
            return Err(ConfigError::TooManyProgramming {
                programming: self.number_of_programming_questions,
                total: self.number_of_questions,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_custom_language() {
        let config = SessionConfig::new(SessionKind::Quiz, "   ", Difficulty::Beginner);
        assert_eq!(config.validate(), Err(ConfigError::EmptyLanguage));
    }

    #[test]
    fn rejects_more_programming_than_total() {
        let config = SessionConfig::new(SessionKind::Assessment, "Rust", Difficulty::Advanced)
            .with_counts(2, 3);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyProgramming {
                programming: 3,
                total: 2
            })
        );
    }

    #[test]
    fn blank_topic_is_dropped() {
        let config =
            SessionConfig::new(SessionKind::Assessment, "Go", Difficulty::Beginner).with_topic(" ");
        assert_eq!(config.topic, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn serializes_with_wire_names() {
        let config = SessionConfig::new(SessionKind::Quiz, "Python", Difficulty::Intermediate)
            .with_counts(3, 0);
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["type"], "quiz");
        assert_eq!(json["difficulty"], "Intermediate");
        assert_eq!(json["numberOfQuestions"], 3);
        assert!(json.get("topic").is_none());
    }
}
