use async_trait::async_trait;
use quiz_core::model::{ResultRecord, UserId};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::json_store::JsonFileResultStore;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Destination for finished sessions. Called once per completed session.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Store a result record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    async fn persist(&self, record: &ResultRecord) -> Result<(), StorageError>;
}

/// Read side of the result store.
#[async_trait]
pub trait ResultRepository: ResultSink {
    /// All stored results of a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn list_results(&self, user_id: UserId) -> Result<Vec<ResultRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    results: Arc<Mutex<Vec<ResultRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records written so far.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }
}

#[async_trait]
impl ResultSink for InMemoryRepository {
    async fn persist(&self, record: &ResultRecord) -> Result<(), StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn list_results(&self, user_id: UserId) -> Result<Vec<ResultRecord>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut found: Vec<ResultRecord> = guard
            .iter()
            .filter(|r| r.user_id() == user_id)
            .cloned()
            .collect();
        found.sort_by_key(ResultRecord::completed_at);
        Ok(found)
    }
}

/// Aggregates the result store behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sink: Arc<dyn ResultSink>,
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let sink: Arc<dyn ResultSink> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo);
        Self { sink, results }
    }

    /// One pretty-printed JSON file per result inside `dir`.
    #[must_use]
    pub fn json_dir(dir: impl Into<PathBuf>) -> Self {
        let store = JsonFileResultStore::new(dir);
        let sink: Arc<dyn ResultSink> = Arc::new(store.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(store);
        Self { sink, results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{ScoreBoard, UserProfile};
    use quiz_core::time::fixed_now;

    fn record(user: i64, minutes: i64) -> ResultRecord {
        ResultRecord::new(
            &UserProfile::new(UserId::new(user), None),
            fixed_now() + Duration::minutes(minutes),
            Vec::new(),
            ScoreBoard::new(),
        )
    }

    #[tokio::test]
    async fn in_memory_lists_per_user_oldest_first() {
        let repo = InMemoryRepository::new();
        repo.persist(&record(1, 10)).await.unwrap();
        repo.persist(&record(2, 5)).await.unwrap();
        repo.persist(&record(1, 0)).await.unwrap();

        let mine = repo.list_results(UserId::new(1)).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine[0].completed_at() < mine[1].completed_at());
        assert_eq!(repo.len().unwrap(), 3);
    }

    #[tokio::test]
    async fn storage_handles_share_one_backend() {
        let storage = Storage::in_memory();
        storage.sink.persist(&record(3, 0)).await.unwrap();
        let listed = storage.results.list_results(UserId::new(3)).await.unwrap();
        assert_eq!(listed.len(), 1);
    }
}
