//! Small notes database driven through the backend adapter.
//!
//! Creates the `notes` table on first run, optionally adds a note, then prints
//! every note as JSON.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sqlite_backend::prelude::*;
use tracing::Level;

const CREATE_NOTES_TABLE: &str = "CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "List and add notes in an embedded SQLite database")]
struct Args {
    /// Logical database name; stored as `<dir>/<db-name>.db`.
    #[arg(long, default_value = "helloWorld")]
    db_name: String,
    #[arg(long, default_value = ".")]
    dir: PathBuf,
    /// Title of a note to add before listing.
    #[arg(long)]
    add: Option<String>,
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(Level::from(args.log_level))
        .init();

    let dir = args.dir.clone();
    let factory = BackendOptions::builder()
        .build(move |name| dir.join(format!("{name}.db")).to_string_lossy().into_owned());

    let stopped = StopSignal::new();
    let mut db = factory.create(&args.db_name, stopped.clone());
    db.initialize().await?;

    db.exec_queries(
        &[Query::without_params(CREATE_NOTES_TABLE)],
        &ExecOptions::suppressed(),
    )
    .await?;

    if let Some(title) = args.add {
        db.exec_queries(
            &[Query::new(
                "INSERT INTO notes (title) VALUES (?)",
                vec![RowValues::Text(title)],
            )],
            &ExecOptions::default(),
        )
        .await?;
    }

    let mut results = db
        .exec_queries(
            &[Query::without_params(
                "SELECT id, title, created_at FROM notes ORDER BY id",
            )],
            &ExecOptions::default(),
        )
        .await?;
    let notes = results.pop().unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(&notes)?);

    stopped.stop();
    Ok(())
}
