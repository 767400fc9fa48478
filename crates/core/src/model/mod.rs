mod activity;
mod answer;
mod config;
mod evaluation;
mod insights;
mod question;
mod stored;
mod trial;

pub use activity::{ActivityKind, ActivityRecord};
pub use answer::{Answer, IndexedAnswer};
pub use config::{ConfigError, Difficulty, SessionConfig, SessionKind};
pub use evaluation::{DetailedResult, EvaluationResult, ProgrammingRubric, RubricError};
pub use insights::{ProgressInsights, UserProfile};
pub use question::{
    MultipleChoiceQuestion, ProgrammingQuestion, Question, QuestionKind, TestCase,
};
pub use stored::{NewStoredResult, ResultId, StoredResult};
pub use trial::{TestCaseOutcome, TrialRunReport};
