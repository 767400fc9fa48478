use std::sync::Arc;

use assess_core::model::{ActivityRecord, UserProfile};
use storage::repository::ActivityRepository;

use crate::error::ActivityServiceError;

/// Number of records handed to the insights service as a profile.
pub const PROFILE_HISTORY_LIMIT: u32 = 50;

/// Read access to the activity log.
#[derive(Clone)]
pub struct ActivityService {
    activities: Arc<dyn ActivityRepository>,
}

impl ActivityService {
    #[must_use]
    pub fn new(activities: Arc<dyn ActivityRepository>) -> Self {
        Self { activities }
    }

    /// Most recent `limit` records, most recent last.
    ///
    /// # Errors
    ///
    /// Returns `ActivityServiceError::Storage` if repository access fails.
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<ActivityRecord>, ActivityServiceError> {
        Ok(self.activities.list_recent_activities(limit).await?)
    }

    /// Build the profile sent for progress insights.
    ///
    /// # Errors
    ///
    /// Returns `ActivityServiceError::Storage` if repository access fails.
    pub async fn profile(
        &self,
        display_name: Option<String>,
    ) -> Result<UserProfile, ActivityServiceError> {
        let activities = self.list_recent(PROFILE_HISTORY_LIMIT).await?;
        Ok(UserProfile {
            display_name,
            activities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::ActivityKind;
    use assess_core::time::fixed_now;
    use chrono::Duration;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn profile_carries_recent_activity_in_order() {
        let repo = Arc::new(InMemoryRepository::new());
        for (offset, score) in [(2, 40), (1, 70)] {
            let record = ActivityRecord::new(
                ActivityKind::Quiz,
                "Go",
                score,
                fixed_now() - Duration::days(offset),
            );
            repo.append_activity(&record).await.unwrap();
        }
        let service = ActivityService::new(repo);

        let profile = service.profile(Some("sam".into())).await.unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("sam"));
        let scores: Vec<u8> = profile.activities.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![40, 70]);
    }
}
