mod explanations;
mod machine;
mod progress;
mod ticker;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use explanations::{ExplanationCache, ExplanationKind};
pub use machine::{
    ExplanationRequest, FailureStage, InProgress, SessionCommand, SessionEvent, SessionFailure,
    SessionMachine, SessionPhase, SessionState, Submission, Transition, TrialRun, TrialRunRequest,
};
pub use progress::SessionProgress;
pub use ticker::Ticker;
pub use workflow::AssessmentService;
