#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sqlite_backend::prelude::*;

/// Factory writing `<dir>/<name>.db`, logging into `logger`.
pub fn factory_in(dir: &Path, logger: Arc<MemoryLogger>) -> SqliteBackendFactory {
    let dir = dir.to_path_buf();
    BackendOptions::builder()
        .build(move |name| dir.join(format!("{name}.db")).to_string_lossy().into_owned())
        .with_logger(logger)
}

/// Factory whose databases live in memory; every backend gets its own.
pub fn memory_factory(logger: Arc<MemoryLogger>) -> SqliteBackendFactory {
    BackendOptions::builder()
        .build(|_| ":memory:".to_owned())
        .with_logger(logger)
}

pub async fn notes_backend(
    logger: Arc<MemoryLogger>,
) -> Result<(SqliteBackend, StopSignal), BackendError> {
    let stopped = StopSignal::new();
    let mut db = memory_factory(logger).create("notes_db", stopped.clone());
    db.initialize().await?;
    db.exec_queries(
        &[Query::without_params(
            "CREATE TABLE notes (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL)",
        )],
        &ExecOptions::suppressed(),
    )
    .await?;
    Ok((db, stopped))
}

/// Poll until the logger has recorded a warning; background handlers run on their own schedule.
pub async fn wait_for_warning(logger: &MemoryLogger) -> Vec<String> {
    for _ in 0..200 {
        let warnings = logger.warnings();
        if !warnings.is_empty() {
            return warnings;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    logger.warnings()
}
