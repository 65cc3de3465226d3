use async_trait::async_trait;
use quiz_core::model::{ResultRecord, UserId};

use super::SqliteRepository;
use super::mapping::{encode_record, map_result_row};
use crate::repository::{ResultRepository, ResultSink, StorageError};

#[async_trait]
impl ResultSink for SqliteRepository {
    async fn persist(&self, record: &ResultRecord) -> Result<(), StorageError> {
        let encoded = encode_record(record)?;

        sqlx::query(
            r"
                INSERT INTO quiz_results (
                    user_id, display_name, completed_at, top_categories, raw_scores
                )
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(record.user_id().value())
        .bind(record.display_name())
        .bind(record.completed_at())
        .bind(encoded.top_categories)
        .bind(encoded.raw_scores)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ResultRepository for SqliteRepository {
    async fn list_results(&self, user_id: UserId) -> Result<Vec<ResultRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT user_id, display_name, completed_at, top_categories, raw_scores
                FROM quiz_results
                WHERE user_id = ?1
                ORDER BY completed_at ASC, id ASC
            ",
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_result_row(&row)?);
        }
        Ok(out)
    }
}
