use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{CategoryName, ScoreBoard, UserId, UserProfile};

/// A category placed in the final ranking, joined with its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCategory {
    pub category: CategoryName,
    pub score: i64,
    pub description: String,
}

/// Outcome of one completed session, written once to the result store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    user_id: UserId,
    display_name: String,
    completed_at: DateTime<Utc>,
    top_categories: Vec<RankedCategory>,
    raw_scores: ScoreBoard,
}

impl ResultRecord {
    #[must_use]
    pub fn new(
        user: &UserProfile,
        completed_at: DateTime<Utc>,
        top_categories: Vec<RankedCategory>,
        raw_scores: ScoreBoard,
    ) -> Self {
        Self {
            user_id: user.id(),
            display_name: user.display_name().to_string(),
            completed_at,
            top_categories,
            raw_scores,
        }
    }

    /// Rehydrate a record from persisted storage.
    #[must_use]
    pub fn from_persisted(
        user_id: UserId,
        display_name: String,
        completed_at: DateTime<Utc>,
        top_categories: Vec<RankedCategory>,
        raw_scores: ScoreBoard,
    ) -> Self {
        Self {
            user_id,
            display_name,
            completed_at,
            top_categories,
            raw_scores,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn top_categories(&self) -> &[RankedCategory] {
        &self.top_categories
    }

    #[must_use]
    pub fn raw_scores(&self) -> &ScoreBoard {
        &self.raw_scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn record_serializes_with_rfc3339_timestamp_and_ordered_scores() {
        let eng = CategoryName::new("Eng").unwrap();
        let art = CategoryName::new("Art").unwrap();
        let record = ResultRecord::new(
            &UserProfile::new(UserId::new(42), None),
            fixed_now(),
            vec![RankedCategory {
                category: eng.clone(),
                score: 4,
                description: "Engineering".into(),
            }],
            [(eng, 4), (art, 0)].into_iter().collect(),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["user_id"], 42);
        assert_eq!(json["display_name"], "anonymous");
        assert_eq!(json["completed_at"], "2023-11-14T22:13:20Z");
        assert_eq!(json["top_categories"][0]["description"], "Engineering");

        let text = serde_json::to_string(&record).unwrap();
        let eng_at = text.find("\"Eng\":4").unwrap();
        let art_at = text.find("\"Art\":0").unwrap();
        assert!(eng_at < art_at);

        let back: ResultRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }
}
