use std::sync::Arc;

use assess_core::model::{ProgressInsights, UserProfile};

use crate::error::InsightsError;
use crate::evaluation::EvaluationClient;

/// Progress insights for the analytics view.
///
/// Failures are logged and collapsed into `InsightsError::Unavailable` so the
/// caller can show an inline message and offer a retry.
#[derive(Clone)]
pub struct InsightsService {
    client: Arc<dyn EvaluationClient>,
}

impl InsightsService {
    #[must_use]
    pub fn new(client: Arc<dyn EvaluationClient>) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns `InsightsError::NoActivity` for a profile without activity.
    /// Returns `InsightsError::Unavailable` when the service call fails.
    pub async fn generate(&self, profile: &UserProfile) -> Result<ProgressInsights, InsightsError> {
        if profile.activities.is_empty() {
            return Err(InsightsError::NoActivity);
        }
        self.client
            .generate_user_progress_insights(profile)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "insight generation failed");
                InsightsError::Unavailable
            })
    }
}
