use indexmap::IndexMap;
use thiserror::Error;

use crate::error::QuizError;
use crate::model::CategoryName;

/// Points an answer option awards, per category, in data-file order.
pub type ScoreMap = IndexMap<CategoryName, i64>;

//
// ─── OPTION ────────────────────────────────────────────────────────────────────
//

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    label: String,
    scores: ScoreMap,
}

impl AnswerOption {
    #[must_use]
    pub fn new(label: impl Into<String>, scores: ScoreMap) -> Self {
        Self {
            label: label.into(),
            scores,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Category points awarded by this option. May be empty.
    #[must_use]
    pub fn scores(&self) -> &ScoreMap {
        &self.scores
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    index: usize,
    prompt: String,
    options: Vec<AnswerOption>,
}

impl Question {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&AnswerOption> {
        self.options.get(index)
    }
}

/// A question as read from configuration, before it is placed in a bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: Vec<AnswerOption>,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(prompt: impl Into<String>, options: Vec<AnswerOption>) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question {index} has no options")]
    NoOptions { index: usize },

    #[error("question {index} has an empty prompt")]
    EmptyPrompt { index: usize },
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// Immutable, ordered list of questions. A question's index is its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from drafts, assigning indices by position.
    ///
    /// An empty bank is representable; starting a session on it fails with
    /// `QuizError::NoQuestions`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` if a question has a blank prompt or no options.
    pub fn new(drafts: Vec<QuestionDraft>) -> Result<Self, QuestionBankError> {
        let mut questions = Vec::with_capacity(drafts.len());
        for (index, draft) in drafts.into_iter().enumerate() {
            if draft.prompt.trim().is_empty() {
                return Err(QuestionBankError::EmptyPrompt { index });
            }
            if draft.options.is_empty() {
                return Err(QuestionBankError::NoOptions { index });
            }
            questions.push(Question {
                index,
                prompt: draft.prompt,
                options: draft.options,
            });
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// # Errors
    ///
    /// Returns `QuizError::OutOfRange` if `index >= question_count()`.
    pub fn question_at(&self, index: usize) -> Result<&Question, QuizError> {
        self.questions.get(index).ok_or(QuizError::OutOfRange {
            index,
            count: self.questions.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// Every category referenced by any option, in first-seen order.
    #[must_use]
    pub fn referenced_categories(&self) -> Vec<&CategoryName> {
        let mut seen: IndexMap<&CategoryName, ()> = IndexMap::new();
        for option in self.questions.iter().flat_map(|q| q.options.iter()) {
            for name in option.scores.keys() {
                seen.insert(name, ());
            }
        }
        seen.into_keys().collect()
    }
}
