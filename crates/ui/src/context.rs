use std::sync::{Arc, Mutex, PoisonError};

use assess_core::model::SessionConfig;
use services::{ActivityService, AssessmentService, InsightsService, ResultService};

pub trait UiApp: Send + Sync {
    fn assessments(&self) -> Arc<AssessmentService>;
    fn activities(&self) -> Arc<ActivityService>;
    fn results(&self) -> Arc<ResultService>;
    fn insights(&self) -> Arc<InsightsService>;
}

#[derive(Clone)]
pub struct AppContext {
    assessments: Arc<AssessmentService>,
    activities: Arc<ActivityService>,
    results: Arc<ResultService>,
    insights: Arc<InsightsService>,
    pending_config: Arc<Mutex<Option<SessionConfig>>>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            assessments: app.assessments(),
            activities: app.activities(),
            results: app.results(),
            insights: app.insights(),
            pending_config: Arc::new(Mutex::new(None)),
        }
    }

    #[must_use]
    pub fn assessments(&self) -> Arc<AssessmentService> {
        Arc::clone(&self.assessments)
    }

    #[must_use]
    pub fn activities(&self) -> Arc<ActivityService> {
        Arc::clone(&self.activities)
    }

    #[must_use]
    pub fn results(&self) -> Arc<ResultService> {
        Arc::clone(&self.results)
    }

    #[must_use]
    pub fn insights(&self) -> Arc<InsightsService> {
        Arc::clone(&self.insights)
    }

    /// Hand a validated configuration to the session page.
    pub fn set_pending_config(&self, config: SessionConfig) {
        *self
            .pending_config
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(config);
    }

    /// One-shot: the session page consumes the configuration when it mounts.
    #[must_use]
    pub fn take_pending_config(&self) -> Option<SessionConfig> {
        self.pending_config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
