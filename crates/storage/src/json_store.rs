//! Result store that writes one JSON document per completed session.
//!
//! Files are named `result_<user_id>_<YYYYmmdd_HHMMSS>.json`. A second
//! result for the same user within the same second gets a `_<n>` suffix
//! instead of overwriting the first.

use async_trait::async_trait;
use quiz_core::model::{ResultRecord, UserId};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::repository::{ResultRepository, ResultSink, StorageError};

const MAX_NAME_ATTEMPTS: u32 = 100;

fn io_err(path: &Path, e: &std::io::Error) -> StorageError {
    StorageError::Io(format!("{}: {e}", path.display()))
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[derive(Debug, Clone)]
pub struct JsonFileResultStore {
    dir: PathBuf,
}

impl JsonFileResultStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Base file name (without extension) for a record.
    #[must_use]
    pub fn file_stem(record: &ResultRecord) -> String {
        format!(
            "result_{}_{}",
            record.user_id(),
            record.completed_at().format("%Y%m%d_%H%M%S")
        )
    }

    fn user_prefix(user_id: UserId) -> String {
        format!("result_{user_id}_")
    }
}

#[async_trait]
impl ResultSink for JsonFileResultStore {
    async fn persist(&self, record: &ResultRecord) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_err(&self.dir, &e))?;

        let body = serde_json::to_vec_pretty(record).map_err(ser)?;
        let stem = Self::file_stem(record);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{stem}.json")
            } else {
                format!("{stem}_{attempt}.json")
            };
            let path = self.dir.join(name);
            let file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;
            let mut file = match file {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(io_err(&path, &e)),
            };
            file.write_all(&body).await.map_err(|e| io_err(&path, &e))?;
            file.flush().await.map_err(|e| io_err(&path, &e))?;
            return Ok(());
        }

        Err(StorageError::Conflict)
    }
}

#[async_trait]
impl ResultRepository for JsonFileResultStore {
    async fn list_results(&self, user_id: UserId) -> Result<Vec<ResultRecord>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(&self.dir, &e)),
        };

        let prefix = Self::user_prefix(user_id);
        let mut found = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_err(&self.dir, &e))?
        {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.starts_with(&prefix) || !name.ends_with(".json") {
                continue;
            }
            let path = entry.path();
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| io_err(&path, &e))?;
            let record: ResultRecord = serde_json::from_slice(&bytes).map_err(ser)?;
            found.push(record);
        }

        found.sort_by_key(ResultRecord::completed_at);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{CategoryName, RankedCategory, ScoreBoard, UserProfile};
    use quiz_core::time::fixed_now;

    fn record(user: i64) -> ResultRecord {
        let eng = CategoryName::new("Eng").unwrap();
        ResultRecord::new(
            &UserProfile::new(UserId::new(user), Some("bob".into())),
            fixed_now(),
            vec![RankedCategory {
                category: eng.clone(),
                score: 4,
                description: "Engineering".into(),
            }],
            [(eng, 4)].into_iter().collect::<ScoreBoard>(),
        )
    }

    #[test]
    fn file_stem_uses_user_and_compact_timestamp() {
        assert_eq!(
            JsonFileResultStore::file_stem(&record(42)),
            "result_42_20231114_221320"
        );
    }

    #[tokio::test]
    async fn persist_creates_directory_and_reads_back() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonFileResultStore::new(tmp.path().join("user_results"));

        store.persist(&record(42)).await.unwrap();

        let written = store.dir().join("result_42_20231114_221320.json");
        assert!(written.exists());
        let listed = store.list_results(UserId::new(42)).await.unwrap();
        assert_eq!(listed, vec![record(42)]);
    }

    #[tokio::test]
    async fn same_second_results_do_not_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonFileResultStore::new(tmp.path());

        store.persist(&record(7)).await.unwrap();
        store.persist(&record(7)).await.unwrap();
        store.persist(&record(8)).await.unwrap();

        assert!(tmp.path().join("result_7_20231114_221320_1.json").exists());
        assert_eq!(store.list_results(UserId::new(7)).await.unwrap().len(), 2);
        assert_eq!(store.list_results(UserId::new(8)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn listing_missing_directory_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonFileResultStore::new(tmp.path().join("absent"));
        assert!(store.list_results(UserId::new(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unwritable_target_reports_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        std::fs::write(&blocker, b"x").unwrap();
        let store = JsonFileResultStore::new(&blocker);

        let err = store.persist(&record(1)).await.unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
