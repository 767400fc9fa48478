use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use assess_core::model::{
    EvaluationResult, IndexedAnswer, ProgressInsights, Question, SessionConfig, TestCase,
    TrialRunReport, UserProfile,
};

use super::EvaluationClient;
use crate::error::EvaluationClientError;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct EvaluationClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl EvaluationClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Read `ASSESS_EVAL_BASE_URL`, `ASSESS_EVAL_API_KEY` and `ASSESS_EVAL_TIMEOUT_SECS`.
    ///
    /// Returns `None` when no base URL is configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("ASSESS_EVAL_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let api_key = env::var("ASSESS_EVAL_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let timeout = env::var("ASSESS_EVAL_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);
        Some(Self {
            base_url,
            api_key,
            timeout,
        })
    }
}

/// Client with the configured timeout. A builder failure falls back to the
/// default client, which has no request timeout.
fn build_client(config: Option<&EvaluationClientConfig>) -> Client {
    let Some(config) = config else {
        return Client::default();
    };
    match Client::builder().timeout(config.timeout).build() {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(
                error = %err,
                timeout_secs = config.timeout.as_secs(),
                "evaluation client builder failed; using default client without timeout"
            );
            Client::default()
        }
    }
}

/// JSON-over-HTTP client for the evaluation service.
///
/// Every call is a single POST; there are no retries at this layer.
#[derive(Clone)]
pub struct HttpEvaluationClient {
    client: Client,
    config: Option<EvaluationClientConfig>,
}

impl HttpEvaluationClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(EvaluationClientConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<EvaluationClientConfig>) -> Self {
        let client = build_client(config.as_ref());
        Self { client, config }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, EvaluationClientError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let config = self
            .config
            .as_ref()
            .ok_or(EvaluationClientError::Disabled)?;

        let url = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        tracing::debug!(%url, "evaluation service request");

        let mut request = self.client.post(url).json(body);
        if let Some(api_key) = &config.api_key {
            request = request.bearer_auth(api_key);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, path, "evaluation service rejected request");
            return Err(EvaluationClientError::HttpStatus(status));
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(EvaluationClientError::EmptyResponse);
        }
        serde_json::from_slice(&bytes).map_err(|e| EvaluationClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl EvaluationClient for HttpEvaluationClient {
    async fn generate_assessment_questions(
        &self,
        config: &SessionConfig,
    ) -> Result<Vec<Question>, EvaluationClientError> {
        let body: QuestionsResponse = self.post_json("questions/assessment", config).await?;
        Ok(body.questions)
    }

    async fn generate_dynamic_quiz(
        &self,
        config: &SessionConfig,
    ) -> Result<Vec<Question>, EvaluationClientError> {
        let body: QuestionsResponse = self.post_json("questions/quiz", config).await?;
        Ok(body.questions)
    }

    async fn evaluate_assessment(
        &self,
        questions: &[Question],
        answers: &[IndexedAnswer],
        config: &SessionConfig,
    ) -> Result<EvaluationResult, EvaluationClientError> {
        let payload = EvaluateRequest {
            questions,
            answers,
            config,
        };
        self.post_json("evaluations", &payload).await
    }

    async fn evaluate_code_against_test_cases(
        &self,
        code: &str,
        language: &str,
        test_cases: &[TestCase],
    ) -> Result<TrialRunReport, EvaluationClientError> {
        let payload = RunCodeRequest {
            code,
            language,
            test_cases,
        };
        self.post_json("code/run", &payload).await
    }

    async fn get_concept_explanation(
        &self,
        question_text: &str,
    ) -> Result<String, EvaluationClientError> {
        let body: ExplanationResponse = self
            .post_json(
                "explanations",
                &ExplanationRequest {
                    question: question_text,
                },
            )
            .await?;
        let explanation = body.explanation.trim();
        if explanation.is_empty() {
            return Err(EvaluationClientError::EmptyResponse);
        }
        Ok(explanation.to_string())
    }

    async fn generate_user_progress_insights(
        &self,
        profile: &UserProfile,
    ) -> Result<ProgressInsights, EvaluationClientError> {
        self.post_json("insights", profile).await
    }
}

#[derive(Debug, Serialize)]
struct EvaluateRequest<'a> {
    questions: &'a [Question],
    answers: &'a [IndexedAnswer],
    config: &'a SessionConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunCodeRequest<'a> {
    code: &'a str,
    language: &'a str,
    test_cases: &'a [TestCase],
}

#[derive(Debug, Serialize)]
struct ExplanationRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    #[serde(default)]
    questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct ExplanationResponse {
    #[serde(default)]
    explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_client_builds_with_timeout() {
        let config = EvaluationClientConfig {
            timeout: Duration::from_secs(5),
            ..EvaluationClientConfig::new("http://localhost:8000")
        };
        let client = HttpEvaluationClient::new(Some(config));
        assert!(client.enabled());
        assert_eq!(
            client.config.as_ref().map(|config| config.timeout),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn missing_config_leaves_client_disabled() {
        assert!(!HttpEvaluationClient::new(None).enabled());
    }
}
