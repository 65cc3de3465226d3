use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{AnswerOption, CategoryName, ScoreMap};

//
// ─── SCORE BOARD ───────────────────────────────────────────────────────────────
//

/// Running category → points accumulator.
///
/// Keys keep the order in which each category was first scored; ranking
/// relies on that order to break ties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBoard {
    scores: IndexMap<CategoryName, i64>,
}

impl ScoreBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option's points, creating entries as needed.
    pub fn apply(&mut self, points: &ScoreMap) {
        for (category, value) in points {
            let entry = self.scores.entry(category.clone()).or_insert(0);
            *entry = entry.saturating_add(*value);
        }
    }

    /// Subtract an option's points after a rewind.
    ///
    /// Only categories still on the board are touched, and any entry that
    /// drops to zero or below is removed. With negative option points this
    /// is not the exact inverse of [`ScoreBoard::apply`].
    pub fn revert(&mut self, points: &ScoreMap) {
        for (category, value) in points {
            let exhausted = match self.scores.get_mut(category.as_str()) {
                Some(current) => {
                    *current = current.saturating_sub(*value);
                    *current <= 0
                }
                None => false,
            };
            if exhausted {
                self.scores.shift_remove(category.as_str());
            }
        }
    }

    #[must_use]
    pub fn get(&self, category: &str) -> Option<i64> {
        self.scores.get(category).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Entries in first-scored order.
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryName, i64)> {
        self.scores.iter().map(|(name, value)| (name, *value))
    }

    pub fn clear(&mut self) {
        self.scores.clear();
    }
}

impl FromIterator<(CategoryName, i64)> for ScoreBoard {
    fn from_iter<I: IntoIterator<Item = (CategoryName, i64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// The option a user picked for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAnswer {
    pub option_index: usize,
    pub option: AnswerOption,
}

/// Per-user progress through the question bank.
///
/// Mutated only through the quiz engine so that the score board always
/// reflects the recorded answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    started_at: DateTime<Utc>,
    current_question: usize,
    answers: BTreeMap<usize, RecordedAnswer>,
    scores: ScoreBoard,
}

impl SessionState {
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            current_question: 0,
            answers: BTreeMap::new(),
            scores: ScoreBoard::new(),
        }
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn current_question(&self) -> usize {
        self.current_question
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<usize, RecordedAnswer> {
        &self.answers
    }

    #[must_use]
    pub fn answer_for(&self, question: usize) -> Option<&RecordedAnswer> {
        self.answers.get(&question)
    }

    #[must_use]
    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub(crate) fn reset(&mut self, started_at: DateTime<Utc>) {
        self.started_at = started_at;
        self.current_question = 0;
        self.answers.clear();
        self.scores.clear();
    }

    /// Record the answer for the current question and move forward.
    pub(crate) fn record_current(&mut self, option_index: usize, option: AnswerOption) {
        self.scores.apply(option.scores());
        self.answers.insert(
            self.current_question,
            RecordedAnswer {
                option_index,
                option,
            },
        );
        self.current_question += 1;
    }

    /// Move back one question, reversing its answer if one was recorded.
    ///
    /// Callers must ensure `current_question > 0`.
    pub(crate) fn step_back(&mut self) -> Option<RecordedAnswer> {
        self.current_question = self.current_question.saturating_sub(1);
        let popped = self.answers.remove(&self.current_question);
        if let Some(answer) = &popped {
            self.scores.revert(answer.option.scores());
        }
        popped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn points(pairs: &[(&str, i64)]) -> ScoreMap {
        pairs
            .iter()
            .map(|(name, pts)| (CategoryName::new(*name).unwrap(), *pts))
            .collect()
    }

    fn order(board: &ScoreBoard) -> Vec<(&str, i64)> {
        board.iter().map(|(name, v)| (name.as_str(), v)).collect()
    }

    #[test]
    fn apply_accumulates_in_first_seen_order() {
        let mut board = ScoreBoard::new();
        board.apply(&points(&[("Eng", 3), ("Art", 1)]));
        board.apply(&points(&[("Law", 2), ("Eng", 1)]));

        assert_eq!(order(&board), [("Eng", 4), ("Art", 1), ("Law", 2)]);
    }

    #[test]
    fn revert_removes_exhausted_entries() {
        let mut board = ScoreBoard::new();
        board.apply(&points(&[("Eng", 3), ("Art", 1)]));
        board.apply(&points(&[("Eng", 2)]));
        board.revert(&points(&[("Eng", 2)]));
        board.revert(&points(&[("Eng", 3), ("Art", 1)]));

        assert!(board.is_empty());
    }

    #[test]
    fn revert_skips_categories_not_on_board() {
        let mut board = ScoreBoard::new();
        board.apply(&points(&[("Eng", 3)]));
        board.revert(&points(&[("Art", 5)]));

        assert_eq!(order(&board), [("Eng", 3)]);
    }

    #[test]
    fn re_added_category_moves_to_the_end() {
        let mut board = ScoreBoard::new();
        board.apply(&points(&[("Eng", 1), ("Art", 1)]));
        board.revert(&points(&[("Eng", 1)]));
        board.apply(&points(&[("Eng", 1)]));

        assert_eq!(order(&board), [("Art", 1), ("Eng", 1)]);
    }

    #[test]
    fn record_and_step_back_restore_state() {
        let mut session = SessionState::new(fixed_now());
        let option = AnswerOption::new("x", points(&[("Eng", 3)]));
        session.record_current(0, option.clone());

        assert_eq!(session.current_question(), 1);
        assert_eq!(session.scores().get("Eng"), Some(3));

        let popped = session.step_back().unwrap();
        assert_eq!(popped.option, option);
        assert_eq!(session.current_question(), 0);
        assert!(session.answers().is_empty());
        assert!(session.scores().is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = SessionState::new(fixed_now());
        session.record_current(1, AnswerOption::new("y", points(&[("Art", 2)])));
        session.reset(fixed_now());

        assert_eq!(session, SessionState::new(fixed_now()));
    }
}
