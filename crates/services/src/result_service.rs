use std::sync::Arc;

use assess_core::model::{ResultId, StoredResult};
use storage::repository::ResultRepository;

use crate::error::ResultError;

/// Read-only access to saved session results.
#[derive(Clone)]
pub struct ResultService {
    results: Arc<dyn ResultRepository>,
}

impl ResultService {
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self { results }
    }

    /// Fetch a saved result by id.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::NotFound` when no result has that id.
    /// Returns `ResultError::Storage` if repository access fails.
    pub async fn get_result(&self, id: ResultId) -> Result<StoredResult, ResultError> {
        match self.results.get_result(id).await? {
            Some(stored) => Ok(stored),
            None => {
                tracing::debug!(result_id = %id, "result not found");
                Err(ResultError::NotFound(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::{Difficulty, EvaluationResult, NewStoredResult, SessionConfig, SessionKind};
    use assess_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn missing_result_is_not_found() {
        let repo = InMemoryRepository::new();
        let service = ResultService::new(Arc::new(repo.clone()));

        let id = repo
            .save_result(&NewStoredResult {
                config: SessionConfig::new(SessionKind::Quiz, "C", Difficulty::Beginner),
                result: EvaluationResult::new(40, "keep going", Vec::new()),
                completed_at: fixed_now(),
            })
            .await
            .unwrap();

        assert_eq!(service.get_result(id).await.unwrap().result.score(), 40);
        let err = service.get_result(ResultId::new(77)).await.unwrap_err();
        assert!(matches!(err, ResultError::NotFound(missing) if missing == ResultId::new(77)));
    }
}
