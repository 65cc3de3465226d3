use std::path::{Path, PathBuf};
use std::sync::Arc;

use quiz_core::model::{ResultRecord, UserId};
use storage::data::QuizData;
use storage::repository::Storage;
use storage::sqlite::SqliteRepository;
use tracing::{info, warn};

use crate::error::{AppServicesError, ServiceError};
use crate::sessions::QuizService;
use crate::Clock;

/// Where completed results go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultBackend {
    /// One JSON file per result in this directory.
    JsonDir(PathBuf),
    /// `SQLite` database URL.
    Sqlite(String),
    /// Kept in process memory only.
    InMemory,
}

/// Assembles the quiz service over loaded data and a result backend.
#[derive(Clone)]
pub struct AppServices {
    quiz: Arc<QuizService>,
    storage: Storage,
    sqlite: Option<SqliteRepository>,
}

impl AppServices {
    /// Load quiz data from `data_dir` and open the result backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the data files are unusable or the
    /// database cannot be opened.
    pub async fn open(
        data_dir: &Path,
        backend: ResultBackend,
        clock: Clock,
        top_limit: usize,
    ) -> Result<Self, AppServicesError> {
        let data = QuizData::load_dir(data_dir)?;
        for category in data.undescribed_categories() {
            warn!(%category, "category is scored but has no catalog entry");
        }
        info!(
            questions = data.bank.question_count(),
            specialties = data.catalog.len(),
            "quiz data loaded"
        );

        let (storage, sqlite) = match backend {
            ResultBackend::JsonDir(dir) => {
                info!(dir = %dir.display(), "writing results as JSON files");
                (Storage::json_dir(dir), None)
            }
            ResultBackend::Sqlite(url) => {
                let repo = SqliteRepository::connect(&url).await?;
                repo.migrate().await?;
                info!("writing results to SQLite");
                (Storage::from_sqlite(repo.clone()), Some(repo))
            }
            ResultBackend::InMemory => (Storage::in_memory(), None),
        };

        Self::with_storage(clock, data, storage, top_limit).map(|mut services| {
            services.sqlite = sqlite;
            services
        })
    }

    /// Build over already loaded data and storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the question bank is empty.
    pub fn with_storage(
        clock: Clock,
        data: QuizData,
        storage: Storage,
        top_limit: usize,
    ) -> Result<Self, AppServicesError> {
        let quiz = QuizService::new(clock, data.bank, data.catalog, Arc::clone(&storage.sink))?
            .with_top_limit(top_limit);
        Ok(Self {
            quiz: Arc::new(quiz),
            storage,
            sqlite: None,
        })
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    /// Stored results of a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Storage` if the backend cannot be read.
    pub async fn history(&self, user: UserId) -> Result<Vec<ResultRecord>, ServiceError> {
        Ok(self.storage.results.list_results(user).await?)
    }

    /// Close database connections, if any.
    pub async fn shutdown(&self) {
        if let Some(repo) = &self.sqlite {
            repo.close().await;
        }
    }
}
