//! Static quiz data: the question list and the specialty catalog.
//!
//! Both are JSON files read once at startup. Any problem with them is a
//! fatal `DataError`; the process cannot serve sessions without them.

use quiz_core::model::{
    AnswerOption, CategoryName, QuestionBank, QuestionDraft, ScoreMap, SpecialtyCatalog,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub const QUESTIONS_FILE: &str = "questions.json";
pub const SPECIALTIES_FILE: &str = "specialties.json";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DataError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} contains no questions")]
    NoQuestions { path: PathBuf },

    #[error("invalid data in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: quiz_core::Error,
    },
}

/// On-disk shape of one question.
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    question: String,
    options: Vec<OptionRecord>,
}

#[derive(Debug, Deserialize)]
struct OptionRecord {
    text: String,
    #[serde(default)]
    scores: ScoreMap,
}

/// On-disk shape of one catalog entry.
#[derive(Debug, Deserialize)]
struct SpecialtyRecord {
    specialty: CategoryName,
    description: String,
}

fn read(path: &Path) -> Result<String, DataError> {
    std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a question list.
///
/// # Errors
///
/// Returns `DataError` for malformed JSON, an empty list, or a question
/// without options.
pub fn parse_questions(raw: &str, origin: &Path) -> Result<QuestionBank, DataError> {
    let records: Vec<QuestionRecord> =
        serde_json::from_str(raw).map_err(|source| DataError::Json {
            path: origin.to_path_buf(),
            source,
        })?;
    if records.is_empty() {
        return Err(DataError::NoQuestions {
            path: origin.to_path_buf(),
        });
    }

    let drafts = records
        .into_iter()
        .map(|q| {
            let options = q
                .options
                .into_iter()
                .map(|o| AnswerOption::new(o.text, o.scores))
                .collect();
            QuestionDraft::new(q.question, options)
        })
        .collect();

    QuestionBank::new(drafts).map_err(|e| DataError::Invalid {
        path: origin.to_path_buf(),
        source: e.into(),
    })
}

/// Parse a specialty catalog.
///
/// # Errors
///
/// Returns `DataError` for malformed JSON or duplicate entries.
pub fn parse_catalog(raw: &str, origin: &Path) -> Result<SpecialtyCatalog, DataError> {
    let records: Vec<SpecialtyRecord> =
        serde_json::from_str(raw).map_err(|source| DataError::Json {
            path: origin.to_path_buf(),
            source,
        })?;

    SpecialtyCatalog::new(records.into_iter().map(|r| (r.specialty, r.description))).map_err(
        |e| DataError::Invalid {
            path: origin.to_path_buf(),
            source: e.into(),
        },
    )
}

/// # Errors
///
/// See [`parse_questions`]; also fails if the file cannot be read.
pub fn load_question_bank(path: &Path) -> Result<QuestionBank, DataError> {
    parse_questions(&read(path)?, path)
}

/// # Errors
///
/// See [`parse_catalog`]; also fails if the file cannot be read.
pub fn load_catalog(path: &Path) -> Result<SpecialtyCatalog, DataError> {
    parse_catalog(&read(path)?, path)
}

/// Question bank and catalog, loaded together.
#[derive(Debug, Clone)]
pub struct QuizData {
    pub bank: Arc<QuestionBank>,
    pub catalog: Arc<SpecialtyCatalog>,
}

impl QuizData {
    /// Load `questions.json` and `specialties.json` from a directory.
    ///
    /// # Errors
    ///
    /// Returns the first `DataError` encountered.
    pub fn load_dir(dir: &Path) -> Result<Self, DataError> {
        let bank = load_question_bank(&dir.join(QUESTIONS_FILE))?;
        let catalog = load_catalog(&dir.join(SPECIALTIES_FILE))?;
        Ok(Self {
            bank: Arc::new(bank),
            catalog: Arc::new(catalog),
        })
    }

    /// Categories that answers can score but the catalog cannot describe.
    ///
    /// They are legal, but never appear in a report.
    #[must_use]
    pub fn undescribed_categories(&self) -> Vec<&CategoryName> {
        self.bank
            .referenced_categories()
            .into_iter()
            .filter(|name| !self.catalog.contains(name.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTIONS: &str = r#"[
        {
            "question": "What do you enjoy?",
            "options": [
                { "text": "Building things", "scores": { "Eng": 3, "Art": 1 } },
                { "text": "Drawing", "scores": { "Art": 2 } }
            ]
        },
        {
            "question": "Pick one",
            "options": [
                { "text": "Numbers", "scores": { "Eng": 1, "Law": 2 } },
                { "text": "Nothing" }
            ]
        }
    ]"#;

    const CATALOG: &str = r#"[
        { "specialty": "Eng", "description": "Engineering" },
        { "specialty": "Art", "description": "Fine arts" }
    ]"#;

    fn origin() -> &'static Path {
        Path::new("test.json")
    }

    #[test]
    fn parses_questions_with_optional_scores() {
        let bank = parse_questions(QUESTIONS, origin()).unwrap();
        assert_eq!(bank.question_count(), 2);

        let q1 = bank.question_at(1).unwrap();
        assert_eq!(q1.options()[1].label(), "Nothing");
        assert!(q1.options()[1].scores().is_empty());

        let first: Vec<(&str, i64)> = bank.question_at(0).unwrap().options()[0]
            .scores()
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(first, [("Eng", 3), ("Art", 1)]);
    }

    #[test]
    fn empty_question_list_is_fatal() {
        let err = parse_questions("[]", origin()).unwrap_err();
        assert!(matches!(err, DataError::NoQuestions { .. }));
    }

    #[test]
    fn malformed_json_is_fatal() {
        let err = parse_questions("[{\"question\": 1}", origin()).unwrap_err();
        assert!(matches!(err, DataError::Json { .. }));
    }

    #[test]
    fn question_without_options_is_fatal() {
        let err = parse_questions(r#"[{"question": "q", "options": []}]"#, origin()).unwrap_err();
        assert!(matches!(err, DataError::Invalid { .. }));
    }

    #[test]
    fn blank_category_name_is_fatal() {
        let raw = r#"[{"question": "q", "options": [{"text": "a", "scores": {" ": 1}}]}]"#;
        let err = parse_questions(raw, origin()).unwrap_err();
        assert!(matches!(err, DataError::Json { .. }));
    }

    #[test]
    fn duplicate_catalog_entries_are_fatal() {
        let raw = r#"[
            { "specialty": "Eng", "description": "one" },
            { "specialty": "Eng", "description": "two" }
        ]"#;
        let err = parse_catalog(raw, origin()).unwrap_err();
        assert!(matches!(err, DataError::Invalid { .. }));
    }

    #[test]
    fn missing_file_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let err = QuizData::load_dir(tmp.path()).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn load_dir_reports_undescribed_categories() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(QUESTIONS_FILE), QUESTIONS).unwrap();
        std::fs::write(tmp.path().join(SPECIALTIES_FILE), CATALOG).unwrap();

        let data = QuizData::load_dir(tmp.path()).unwrap();
        assert_eq!(data.catalog.describe("Art"), Ok("Fine arts"));

        let missing: Vec<&str> = data
            .undescribed_categories()
            .into_iter()
            .map(CategoryName::as_str)
            .collect();
        assert_eq!(missing, ["Law"]);
    }
}
