use quiz_core::model::{RankedCategory, ResultRecord, ScoreBoard, UserId};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// JSON columns of a result row.
pub(crate) struct EncodedRecord {
    pub top_categories: String,
    pub raw_scores: String,
}

pub(crate) fn encode_record(record: &ResultRecord) -> Result<EncodedRecord, StorageError> {
    Ok(EncodedRecord {
        top_categories: serde_json::to_string(record.top_categories()).map_err(ser)?,
        raw_scores: serde_json::to_string(record.raw_scores()).map_err(ser)?,
    })
}

pub(crate) fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<ResultRecord, StorageError> {
    let user_id = UserId::new(row.try_get::<i64, _>("user_id").map_err(ser)?);
    let display_name: String = row.try_get("display_name").map_err(ser)?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;
    let top_categories: Vec<RankedCategory> =
        serde_json::from_str(&row.try_get::<String, _>("top_categories").map_err(ser)?)
            .map_err(ser)?;
    let raw_scores: ScoreBoard =
        serde_json::from_str(&row.try_get::<String, _>("raw_scores").map_err(ser)?)
            .map_err(ser)?;

    Ok(ResultRecord::from_persisted(
        user_id,
        display_name,
        completed_at,
        top_categories,
        raw_scores,
    ))
}
