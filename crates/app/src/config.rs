//! Startup configuration: defaults, then environment, then flags.

use std::fmt;
use std::path::PathBuf;

use quiz_core::DEFAULT_TOP_LIMIT;
use quiz_core::model::{UserId, UserProfile};
use services::ResultBackend;

pub const ENV_DATA_DIR: &str = "QUIZ_DATA_DIR";
pub const ENV_RESULTS_DIR: &str = "QUIZ_RESULTS_DIR";
pub const ENV_DB_URL: &str = "QUIZ_DB_URL";
pub const ENV_TOP_LIMIT: &str = "QUIZ_TOP_LIMIT";
pub const ENV_USER_ID: &str = "QUIZ_USER_ID";
pub const ENV_USER_NAME: &str = "QUIZ_USER_NAME";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_RESULTS_DIR: &str = "user_results";
const DEFAULT_USER_ID: i64 = 1;

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTopLimit { raw: String },
    InvalidUserId { raw: String },
    InvalidDbUrl { raw: String },
    HelpRequested,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTopLimit { raw } => {
                write!(f, "invalid top limit (expected a positive integer): {raw}")
            }
            ArgsError::InvalidUserId { raw } => write!(f, "invalid user id: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::HelpRequested => write!(f, "help requested"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_top_limit(raw: String) -> Result<usize, ArgsError> {
    match raw.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ArgsError::InvalidTopLimit { raw }),
    }
}

fn parse_user_id(raw: String) -> Result<UserId, ArgsError> {
    raw.parse::<UserId>()
        .map_err(|_| ArgsError::InvalidUserId { raw })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub backend: ResultBackend,
    pub top_limit: usize,
    pub user: UserProfile,
}

impl AppConfig {
    /// Resolve configuration from `lookup` (environment) and `args` (flags).
    ///
    /// Empty environment values count as unset. Flags win over environment.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown flags, missing flag values, or values
    /// that do not parse.
    pub fn resolve(
        args: impl IntoIterator<Item = String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let env = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut data_dir = env(ENV_DATA_DIR).map_or_else(|| DEFAULT_DATA_DIR.into(), PathBuf::from);
        let mut results_dir =
            env(ENV_RESULTS_DIR).map_or_else(|| DEFAULT_RESULTS_DIR.into(), PathBuf::from);
        let mut db_url = env(ENV_DB_URL);
        let mut top_limit = env(ENV_TOP_LIMIT)
            .map(parse_top_limit)
            .transpose()?
            .unwrap_or(DEFAULT_TOP_LIMIT);
        let mut user_id = env(ENV_USER_ID)
            .map(parse_user_id)
            .transpose()?
            .unwrap_or(UserId::new(DEFAULT_USER_ID));
        let mut user_name = env(ENV_USER_NAME);

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => data_dir = require_value(&mut args, "--data-dir")?.into(),
                "--results-dir" => {
                    results_dir = require_value(&mut args, "--results-dir")?.into();
                }
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(value);
                }
                "--top" => top_limit = parse_top_limit(require_value(&mut args, "--top")?)?,
                "--user-id" => user_id = parse_user_id(require_value(&mut args, "--user-id")?)?,
                "--user-name" => user_name = Some(require_value(&mut args, "--user-name")?),
                "--help" | "-h" => return Err(ArgsError::HelpRequested),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let backend = match db_url {
            Some(url) => ResultBackend::Sqlite(normalize_sqlite_url(url)),
            None => ResultBackend::JsonDir(results_dir),
        };

        Ok(Self {
            data_dir,
            backend,
            top_limit,
            user: UserProfile::new(user_id, user_name),
        })
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--data-dir <dir>] [--results-dir <dir> | --db <sqlite_url>] \
         [--top <n>] [--user-id <id>] [--user-name <name>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data-dir {DEFAULT_DATA_DIR}");
    eprintln!("  --results-dir {DEFAULT_RESULTS_DIR}");
    eprintln!("  --top {DEFAULT_TOP_LIMIT}");
    eprintln!("  --user-id {DEFAULT_USER_ID}");
    eprintln!();
    eprintln!("Environment (also read from .env):");
    eprintln!(
        "  {ENV_DATA_DIR}, {ENV_RESULTS_DIR}, {ENV_DB_URL}, {ENV_TOP_LIMIT}, {ENV_USER_ID}, {ENV_USER_NAME}"
    );
    eprintln!("  RUST_LOG (default: info,sqlx=warn)");
}

/// Turn `sqlite:relative.db` into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env_or_flags() {
        let config = AppConfig::resolve(Vec::new(), env(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(
            config.backend,
            ResultBackend::JsonDir(PathBuf::from("user_results"))
        );
        assert_eq!(config.top_limit, 3);
        assert_eq!(config.user.id(), UserId::new(1));
        assert_eq!(config.user.display_name(), "anonymous");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = AppConfig::resolve(
            Vec::new(),
            env(&[
                (ENV_DATA_DIR, "/srv/quiz"),
                (ENV_TOP_LIMIT, "5"),
                (ENV_USER_NAME, "sam"),
                (ENV_DB_URL, "sqlite::memory:"),
            ]),
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/quiz"));
        assert_eq!(config.top_limit, 5);
        assert_eq!(config.user.display_name(), "sam");
        assert_eq!(
            config.backend,
            ResultBackend::Sqlite("sqlite::memory:".into())
        );
    }

    #[test]
    fn flags_override_environment() {
        let config = AppConfig::resolve(
            args(&["--top", "1", "--user-id", "42", "--results-dir", "out"]),
            env(&[(ENV_TOP_LIMIT, "5"), (ENV_USER_ID, "7")]),
        )
        .unwrap();
        assert_eq!(config.top_limit, 1);
        assert_eq!(config.user.id(), UserId::new(42));
        assert_eq!(config.backend, ResultBackend::JsonDir(PathBuf::from("out")));
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let config = AppConfig::resolve(Vec::new(), env(&[(ENV_TOP_LIMIT, "  ")])).unwrap();
        assert_eq!(config.top_limit, DEFAULT_TOP_LIMIT);
    }

    #[test]
    fn zero_top_limit_is_rejected() {
        let err = AppConfig::resolve(args(&["--top", "0"]), env(&[])).unwrap_err();
        assert_eq!(err, ArgsError::InvalidTopLimit { raw: "0".into() });
    }

    #[test]
    fn bad_env_user_id_is_rejected() {
        let err = AppConfig::resolve(Vec::new(), env(&[(ENV_USER_ID, "abc")])).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidUserId { .. }));
    }

    #[test]
    fn missing_flag_value_and_unknown_flags() {
        assert_eq!(
            AppConfig::resolve(args(&["--db"]), env(&[])).unwrap_err(),
            ArgsError::MissingValue { flag: "--db" }
        );
        assert_eq!(
            AppConfig::resolve(args(&["--nope"]), env(&[])).unwrap_err(),
            ArgsError::UnknownArg("--nope".into())
        );
        assert_eq!(
            AppConfig::resolve(args(&["-h"]), env(&[])).unwrap_err(),
            ArgsError::HelpRequested
        );
    }

    #[test]
    fn relative_sqlite_path_becomes_absolute() {
        let url = normalize_sqlite_url("sqlite:results.db".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("results.db"));
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
    }
}
