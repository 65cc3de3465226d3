use std::fmt;
use std::path::PathBuf;

use quiz_core::model::UserId;
use storage::repository::Storage;

#[derive(Debug, Clone)]
enum Source {
    JsonDir(PathBuf),
    Sqlite(String),
}

#[derive(Debug, Clone)]
struct Args {
    source: Source,
    user_id: UserId,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingUser,
    UnknownArg(String),
    InvalidUserId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingUser => write!(f, "--user-id is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user-id value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut source = match std::env::var("QUIZ_DB_URL") {
            Ok(url) if !url.trim().is_empty() => Source::Sqlite(url),
            _ => Source::JsonDir(
                std::env::var("QUIZ_RESULTS_DIR")
                    .map_or_else(|_| PathBuf::from("user_results"), PathBuf::from),
            ),
        };
        let mut user_id = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    source = Source::Sqlite(value);
                }
                "--results-dir" => {
                    let value = require_value(&mut args, "--results-dir")?;
                    source = Source::JsonDir(PathBuf::from(value));
                }
                "--user-id" => {
                    let value = require_value(&mut args, "--user-id")?;
                    let parsed = value
                        .parse::<UserId>()
                        .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?;
                    user_id = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            source,
            user_id: user_id.ok_or(ArgsError::MissingUser)?,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin results -- --user-id <id> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --user-id <id>            User whose results to list (required)");
    eprintln!("  --results-dir <path>      JSON results directory (default: user_results)");
    eprintln!("  --db <sqlite_url>         Read from SQLite instead of JSON files");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_RESULTS_DIR, QUIZ_DB_URL");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = match &args.source {
        Source::JsonDir(dir) => Storage::json_dir(dir.clone()),
        Source::Sqlite(url) => Storage::sqlite(url).await?,
    };

    let results = storage.results.list_results(args.user_id).await?;
    if results.is_empty() {
        println!("No results stored for user {}", args.user_id);
        return Ok(());
    }

    for record in &results {
        println!(
            "{} ({}) at {}",
            record.display_name(),
            record.user_id(),
            record.completed_at().format("%Y-%m-%d %H:%M:%S")
        );
        for (i, ranked) in record.top_categories().iter().enumerate() {
            println!("  {}. {} ({} points)", i + 1, ranked.category, ranked.score);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
