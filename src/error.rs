use thiserror::Error;

/// Errors surfaced by a [`SqliteBackend`](crate::backend::SqliteBackend).
#[derive(Debug, Error)]
pub enum BackendError {
    /// The engine could not open or set up the database at `location`.
    #[error("Connection error: failed to open database at {location}: {source}")]
    ConnectionError {
        location: String,
        #[source]
        source: rusqlite::Error,
    },

    /// `exec_queries` was called before `initialize` finished, or after the stop signal fired.
    #[error("Failed to run queries: {queries}, db not initialized")]
    NotInitialized { queries: String },

    /// A single query in a batch failed; earlier queries in the batch stay applied.
    #[error("SQL execution error in `{query}`: {source}")]
    QueryExecutionError {
        query: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("SQLite worker error: {0}")]
    WorkerError(String),
}

impl BackendError {
    /// SQL text of the failing query, when the error is tied to one.
    #[must_use]
    pub fn query_text(&self) -> Option<&str> {
        match self {
            BackendError::QueryExecutionError { query, .. } => Some(query),
            BackendError::NotInitialized { queries } => Some(queries),
            _ => None,
        }
    }
}
