//! Top-N category ranking.

use std::sync::Arc;

use crate::model::{CategoryName, RankedCategory, ScoreBoard, SpecialtyCatalog};

/// Number of categories reported when no other limit is configured.
pub const DEFAULT_TOP_LIMIT: usize = 3;

/// Highest-scoring categories, best first, at most `limit` of them.
///
/// The sort is stable, so equal scores keep the board's first-scored order.
#[must_use]
pub fn top_scores(scores: &ScoreBoard, limit: usize) -> Vec<(&CategoryName, i64)> {
    let mut ranked: Vec<(&CategoryName, i64)> = scores.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// Joins the top of a score board with catalog descriptions.
#[derive(Debug, Clone)]
pub struct RankingService {
    catalog: Arc<SpecialtyCatalog>,
    limit: usize,
}

impl RankingService {
    #[must_use]
    pub fn new(catalog: Arc<SpecialtyCatalog>) -> Self {
        Self {
            catalog,
            limit: DEFAULT_TOP_LIMIT,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub fn catalog(&self) -> &SpecialtyCatalog {
        &self.catalog
    }

    /// Rank the board and attach descriptions.
    ///
    /// Truncation happens before the catalog lookup; categories the catalog
    /// does not know are dropped afterwards, so the result can be shorter
    /// than the limit.
    #[must_use]
    pub fn rank(&self, scores: &ScoreBoard) -> Vec<RankedCategory> {
        top_scores(scores, self.limit)
            .into_iter()
            .filter_map(|(category, score)| {
                let description = self.catalog.describe(category.as_str()).ok()?;
                Some(RankedCategory {
                    category: category.clone(),
                    score,
                    description: description.to_string(),
                })
            })
            .collect()
    }
}
