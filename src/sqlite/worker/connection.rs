use std::fmt;
use std::sync::Arc;

use crate::error::BackendError;
use crate::results::QueryResult;
use crate::sqlite::config::BackendOptions;

use super::channel::StatementJob;
use super::manager::SqliteWorker;

/// Handle to a connection owned by a dedicated worker thread.
///
/// Clones share the worker; the thread exits when [`close`](Self::close) is called
/// or the last clone is dropped.
#[derive(Clone)]
pub struct SqliteConnection {
    worker: Arc<SqliteWorker>,
}

impl SqliteConnection {
    /// Open `location` on a new worker thread.
    ///
    /// # Errors
    /// Returns [`BackendError::ConnectionError`] if SQLite cannot open or configure the
    /// database, or [`BackendError::WorkerError`] if the thread cannot be spawned.
    pub async fn open(location: &str, options: &BackendOptions) -> Result<Self, BackendError> {
        let worker = SqliteWorker::open(location, options).await?;
        Ok(Self {
            worker: Arc::new(worker),
        })
    }

    pub(crate) async fn execute_queries(
        &self,
        jobs: Vec<StatementJob>,
    ) -> Result<Vec<QueryResult>, BackendError> {
        self.worker.execute_queries(jobs).await
    }

    /// Release the connection. Commands already queued still run first.
    pub fn close(&self) {
        self.worker.shutdown();
    }

    /// Process-unique id of the worker thread, also used in its thread name.
    #[must_use]
    pub fn worker_id(&self) -> u64 {
        self.worker.worker_id()
    }

    #[must_use]
    pub fn location(&self) -> &str {
        self.worker.location()
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("worker_id", &self.worker_id())
            .field("location", &self.location())
            .finish()
    }
}
