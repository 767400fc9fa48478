use async_trait::async_trait;
use assess_core::model::{ActivityRecord, NewStoredResult, ResultId, StoredResult};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Append-only log of completed sessions.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Append one record and return its row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn append_activity(&self, record: &ActivityRecord) -> Result<i64, StorageError>;

    /// The most recent `limit` records, oldest first (most recent last).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_recent_activities(&self, limit: u32) -> Result<Vec<ActivityRecord>, StorageError>;
}

/// Key-value store of evaluated session results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn save_result(&self, result: &NewStoredResult) -> Result<ResultId, StorageError>;

    /// Fetch a stored result; `Ok(None)` when no result has that id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_result(&self, id: ResultId) -> Result<Option<StoredResult>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    activities: Arc<Mutex<Vec<ActivityRecord>>>,
    results: Arc<Mutex<Vec<StoredResult>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl ActivityRepository for InMemoryRepository {
    async fn append_activity(&self, record: &ActivityRecord) -> Result<i64, StorageError> {
        let mut guard = self.activities.lock().map_err(poisoned)?;
        guard.push(record.clone());
        i64::try_from(guard.len()).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn list_recent_activities(&self, limit: u32) -> Result<Vec<ActivityRecord>, StorageError> {
        let guard = self.activities.lock().map_err(poisoned)?;
        let mut sorted = guard.clone();
        // Stable sort keeps insertion order for equal timestamps.
        sorted.sort_by_key(|record| record.timestamp);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let skip = sorted.len().saturating_sub(limit);
        Ok(sorted.into_iter().skip(skip).collect())
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn save_result(&self, result: &NewStoredResult) -> Result<ResultId, StorageError> {
        let mut guard = self.results.lock().map_err(poisoned)?;
        let next = i64::try_from(guard.len() + 1)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let id = ResultId::new(next);
        guard.push(result.clone().with_id(id));
        Ok(id)
    }

    async fn get_result(&self, id: ResultId) -> Result<Option<StoredResult>, StorageError> {
        let guard = self.results.lock().map_err(poisoned)?;
        Ok(guard.iter().find(|stored| stored.id == id).cloned())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub activities: Arc<dyn ActivityRepository>,
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let activities: Arc<dyn ActivityRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo);
        Self {
            activities,
            results,
        }
    }
}
