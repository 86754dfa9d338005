//! Batch diagnostics for the backend.
//!
//! The backend never writes to a process-wide sink directly; it reports through a
//! [`QueryLogger`] handed to it at construction. [`TracingLogger`] forwards to
//! `tracing`, [`MemoryLogger`] keeps lines in memory for inspection.

use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::query::Query;

/// Transaction ids are shortened to this many characters in log lines.
pub const TRANSACTION_ID_LEN: usize = 6;

/// Everything needed to render one batch timing line.
#[derive(Debug, Clone, Copy)]
pub struct BatchLogEntry<'a> {
    pub db_name: &'a str,
    pub transaction_id: Option<&'a str>,
    pub queries: &'a [Query],
    pub elapsed: Duration,
}

impl BatchLogEntry<'_> {
    /// The transaction tag as it appears in the line, if any.
    #[must_use]
    pub fn short_transaction_id(&self) -> Option<&str> {
        self.transaction_id
            .filter(|id| !id.is_empty())
            .map(|id| truncate_chars(id, TRANSACTION_ID_LEN))
    }
}

/// `[<db>][tr_id=<id>] <sql1> <sql2> ... Time: <seconds>`
impl fmt::Display for BatchLogEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.db_name)?;
        if let Some(id) = self.short_transaction_id() {
            write!(f, "[tr_id={id}]")?;
        }
        f.write_str(" ")?;
        for (i, query) in self.queries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(query.text())?;
        }
        write!(f, " Time: {:.4}", self.elapsed.as_secs_f64())
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Sink for backend diagnostics.
pub trait QueryLogger: Send + Sync {
    /// Called once per successful, unsuppressed batch.
    fn log_batch(&self, entry: &BatchLogEntry<'_>);

    /// Non-fatal conditions, such as a stop signal arriving before the connection opened.
    fn warn(&self, db_name: &str, message: &str);
}

/// Default logger: batch lines at `INFO`, diagnostics at `WARN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl QueryLogger for TracingLogger {
    fn log_batch(&self, entry: &BatchLogEntry<'_>) {
        tracing::info!(
            db = entry.db_name,
            queries = entry.queries.len(),
            "{entry}"
        );
    }

    fn warn(&self, db_name: &str, message: &str) {
        tracing::warn!(db = db_name, "{message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    Batch(String),
    Warning(String),
}

/// Logger that records rendered lines, in order.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<LogLine>>,
}

impl MemoryLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, line: LogLine) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }

    #[must_use]
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn batches(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|line| match line {
                LogLine::Batch(text) => Some(text),
                LogLine::Warning(_) => None,
            })
            .collect()
    }

    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|line| match line {
                LogLine::Warning(text) => Some(text),
                LogLine::Batch(_) => None,
            })
            .collect()
    }
}

impl QueryLogger for MemoryLogger {
    fn log_batch(&self, entry: &BatchLogEntry<'_>) {
        self.push(LogLine::Batch(entry.to_string()));
    }

    fn warn(&self, db_name: &str, message: &str) {
        self.push(LogLine::Warning(format!("[{db_name}] {message}")));
    }
}
