use thiserror::Error;

use crate::model::{CatalogError, CategoryNameError, QuestionBankError};

/// Failures of a quiz session operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question index {index} out of range (question count {count})")]
    OutOfRange { index: usize, count: usize },

    #[error("invalid selection: question {question}, option {option}")]
    InvalidSelection { question: usize, option: usize },

    #[error("question bank is empty")]
    NoQuestions,

    #[error("already at the first question")]
    NoPreviousQuestion,

    #[error("no active session")]
    NoSession,
}

/// Errors raised while assembling static quiz data.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    CategoryName(#[from] CategoryNameError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    QuestionBank(#[from] QuestionBankError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
