#![forbid(unsafe_code)]

pub mod activity_service;
pub mod app_services;
pub mod error;
pub mod evaluation;
pub mod insights_service;
pub mod result_service;
pub mod sessions;

pub use assess_core::Clock;

pub use activity_service::ActivityService;
pub use app_services::AppServices;
pub use error::{
    ActivityServiceError, AppServicesError, EvaluationClientError, InsightsError, ResultError,
    SessionError,
};
pub use evaluation::{EvaluationClient, EvaluationClientConfig, HttpEvaluationClient};
pub use insights_service::InsightsService;
pub use result_service::ResultService;
pub use sessions::{
    AssessmentService, ExplanationKind, SessionCommand, SessionEvent, SessionMachine,
    SessionPhase, SessionProgress, SessionState, Ticker, Transition,
};
