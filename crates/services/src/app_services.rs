use std::sync::Arc;

use storage::repository::Storage;

use crate::activity_service::ActivityService;
use crate::error::AppServicesError;
use crate::evaluation::EvaluationClient;
use crate::insights_service::InsightsService;
use crate::result_service::ResultService;
use crate::sessions::AssessmentService;
use crate::Clock;

/// Assembles app-facing services over one storage backend and one evaluation client.
#[derive(Clone)]
pub struct AppServices {
    assessments: Arc<AssessmentService>,
    activities: Arc<ActivityService>,
    results: Arc<ResultService>,
    insights: Arc<InsightsService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        client: Arc<dyn EvaluationClient>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, client))
    }

    /// Build services over in-memory repositories.
    #[must_use]
    pub fn in_memory(clock: Clock, client: Arc<dyn EvaluationClient>) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, client)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, client: Arc<dyn EvaluationClient>) -> Self {
        let assessments = Arc::new(AssessmentService::new(
            clock,
            Arc::clone(&client),
            Arc::clone(&storage.activities),
            Arc::clone(&storage.results),
        ));
        let activities = Arc::new(ActivityService::new(Arc::clone(&storage.activities)));
        let results = Arc::new(ResultService::new(Arc::clone(&storage.results)));
        let insights = Arc::new(InsightsService::new(client));

        Self {
            assessments,
            activities,
            results,
            insights,
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
}
