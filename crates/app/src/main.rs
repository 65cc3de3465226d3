use services::{AppServices, Clock, Directive, ResultBackend};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::{AppConfig, ArgsError, print_usage};
use console::{HINT, Input, parse_input};

const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn";

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; real environment variables take precedence.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match AppConfig::resolve(std::env::args().skip(1), |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(ArgsError::HelpRequested) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return Err(e.into());
        }
    };

    if let ResultBackend::Sqlite(url) = &config.backend {
        prepare_sqlite_file(url)?;
    }

    let services = AppServices::open(
        &config.data_dir,
        config.backend.clone(),
        Clock::system(),
        config.top_limit,
    )
    .await?;
    let quiz = services.quiz();
    info!(user_id = %config.user.id(), "console session ready");

    println!("{}\n", quiz.welcome().render_text());
    println!("{HINT}\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut current_question: Option<usize> = None;
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line, current_question) {
            Input::Blank => {}
            Input::Quit => break,
            Input::Unrecognized => println!("{HINT}\n"),
            Input::Welcome => println!("{}\n", quiz.welcome().render_text()),
            Input::Event(event) => {
                let directive = quiz.handle(&config.user, event).await;
                current_question = match &directive {
                    Directive::ShowPrompt { prompt, .. } => Some(prompt.question_index),
                    Directive::Error(notice) if notice.session_kept => current_question,
                    _ => None,
                };
                println!("{}\n", directive.render_text());
            }
        }
    }

    services.shutdown().await;
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
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
