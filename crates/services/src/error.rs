//! Shared error types for the services crate.

use thiserror::Error;

use assess_core::LedgerError;
use assess_core::model::{ConfigError, ResultId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `EvaluationClient` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvaluationClientError {
    #[error("evaluation service is not configured")]
    Disabled,
    #[error("evaluation service returned an empty response")]
    EmptyResponse,
    #[error("evaluation service request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("evaluation service returned malformed data: {0}")]
    Decode(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the session state machine and `AssessmentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session is not in progress")]
    NotInProgress,
    #[error("select an option before continuing")]
    SelectionRequired,
    #[error("already on the last question")]
    LastQuestion,
    #[error("submit is only available on the last question")]
    NotLastQuestion,
    #[error("option {option} is not valid for this question")]
    InvalidOption { option: usize },
    #[error("this question does not take code")]
    NotProgramming,
    #[error("this question is not multiple choice")]
    NotMultipleChoice,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("a trial run is already in progress")]
    TrialRunBusy,
    #[error("an explanation request is already in flight")]
    ExplanationBusy,
    #[error("question {0} does not exist in this session")]
    QuestionOutOfRange(usize),
    #[error("nothing to retry")]
    NothingToRetry,
    #[error("response does not match the current session state")]
    UnexpectedResponse,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Client(#[from] EvaluationClientError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ActivityService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ActivityServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ResultService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultError {
    #[error("no saved result with id {0}")]
    NotFound(ResultId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `InsightsService`.
///
/// Service failures are collapsed into a single retryable variant; the cause
/// is logged, not shown.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InsightsError {
    #[error("Could not generate insights right now. Please try again.")]
    Unavailable,
    #[error("Complete an assessment or quiz to unlock insights.")]
    NoActivity,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
