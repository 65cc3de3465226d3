#![forbid(unsafe_code)]

pub mod data;
pub mod json_store;
pub mod repository;
pub mod sqlite;

pub use data::{DataError, QuizData};
pub use repository::{
    InMemoryRepository, ResultRepository, ResultSink, Storage, StorageError,
};
