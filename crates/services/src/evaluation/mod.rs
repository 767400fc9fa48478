//! Boundary to the external evaluation service.
//!
//! Question generation, scoring, code execution, explanations and insights all
//! live behind this trait; nothing in the workspace reimplements them.

mod http;

use async_trait::async_trait;

use assess_core::model::{
    EvaluationResult, IndexedAnswer, ProgressInsights, Question, SessionConfig, SessionKind,
    TestCase, TrialRunReport, UserProfile,
};

use crate::error::EvaluationClientError;

pub use http::{EvaluationClientConfig, HttpEvaluationClient};

#[async_trait]
pub trait EvaluationClient: Send + Sync {
    /// Static, possibly topic-focused question set.
    async fn generate_assessment_questions(
        &self,
        config: &SessionConfig,
    ) -> Result<Vec<Question>, EvaluationClientError>;

    /// Dynamically generated, broader question set.
    async fn generate_dynamic_quiz(
        &self,
        config: &SessionConfig,
    ) -> Result<Vec<Question>, EvaluationClientError>;

    async fn evaluate_assessment(
        &self,
        questions: &[Question],
        answers: &[IndexedAnswer],
        config: &SessionConfig,
    ) -> Result<EvaluationResult, EvaluationClientError>;

    async fn evaluate_code_against_test_cases(
        &self,
        code: &str,
        language: &str,
        test_cases: &[TestCase],
    ) -> Result<TrialRunReport, EvaluationClientError>;

    async fn get_concept_explanation(
        &self,
        question_text: &str,
    ) -> Result<String, EvaluationClientError>;

    async fn generate_user_progress_insights(
        &self,
        profile: &UserProfile,
    ) -> Result<ProgressInsights, EvaluationClientError>;

    /// Pick the generation call that matches the session kind.
    async fn generate_questions(
        &self,
        config: &SessionConfig,
    ) -> Result<Vec<Question>, EvaluationClientError> {
        match config.kind {
            SessionKind::Assessment => self.generate_assessment_questions(config).await,
            SessionKind::Quiz => self.generate_dynamic_quiz(config).await,
        }
    }
}
