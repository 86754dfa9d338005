//! The backend adapter: a per-database handle with an initialize / execute / stop
//! lifecycle over a worker-owned SQLite connection.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::BackendError;
use crate::logging::{BatchLogEntry, QueryLogger, TracingLogger};
use crate::options::ExecOptions;
use crate::query::{Query, batch_text};
use crate::results::QueryResult;
use crate::sqlite::config::BackendOptions;
use crate::sqlite::worker::{SqliteConnection, StatementJob};
use crate::stop::StopSignal;

/// Maps a logical database name to a storage location. Must be pure.
pub type LocationResolver = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// What a database client needs from a storage backend.
///
/// Both methods take `&mut self`: calls on one instance are serialized by the caller.
#[async_trait]
pub trait DbBackend: Send {
    /// Open the underlying connection. Call once, before any queries.
    async fn initialize(&mut self) -> Result<(), BackendError>;

    /// Run `queries` in order on the one connection, returning one result per query.
    async fn exec_queries(
        &mut self,
        queries: &[Query],
        options: &ExecOptions,
    ) -> Result<Vec<QueryResult>, BackendError>;
}

/// Produces one backend per logical database.
pub trait BackendFactory {
    type Backend: DbBackend;

    /// Build an uninitialized backend. Performs no I/O.
    fn create(&self, db_name: &str, stopped: StopSignal) -> Self::Backend;
}

/// Factory for [`SqliteBackend`]s sharing a resolver, options and logger.
#[derive(Clone)]
pub struct SqliteBackendFactory {
    resolve: LocationResolver,
    options: BackendOptions,
    logger: Arc<dyn QueryLogger>,
}

impl SqliteBackendFactory {
    #[must_use]
    pub fn new(resolve: LocationResolver) -> Self {
        Self {
            resolve,
            options: BackendOptions::default(),
            logger: Arc::new(TracingLogger),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BackendOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn QueryLogger>) -> Self {
        self.logger = logger;
        self
    }

    #[must_use]
    pub fn options(&self) -> &BackendOptions {
        &self.options
    }
}

impl BackendFactory for SqliteBackendFactory {
    type Backend = SqliteBackend;

    fn create(&self, db_name: &str, stopped: StopSignal) -> SqliteBackend {
        SqliteBackend {
            db_name: db_name.to_owned(),
            location: (self.resolve)(db_name),
            options: self.options.clone(),
            logger: Arc::clone(&self.logger),
            stopped,
            connection: None,
            stop_watcher: None,
        }
    }
}

impl fmt::Debug for SqliteBackendFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteBackendFactory")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Backend for one logical database. Owns its connection exclusively.
pub struct SqliteBackend {
    db_name: String,
    location: String,
    options: BackendOptions,
    logger: Arc<dyn QueryLogger>,
    stopped: StopSignal,
    connection: Option<SqliteConnection>,
    stop_watcher: Option<JoinHandle<()>>,
}

impl SqliteBackend {
    #[must_use]
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// True between a successful `initialize` and the stop signal.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.connection.is_some() && !self.stopped.is_stopped()
    }

    fn release(&mut self) {
        if let Some(conn) = self.connection.take() {
            tracing::debug!(db = %self.db_name, "releasing sqlite connection");
            conn.close();
        }
    }

    fn not_initialized(queries: &[Query]) -> BackendError {
        BackendError::NotInitialized {
            queries: batch_text(queries),
        }
    }

    /// A worker that hung up because the stop handler closed it mid-batch means the
    /// backend was shut down, not that the worker failed.
    fn classify_batch_error(&mut self, err: BackendError, queries: &[Query]) -> BackendError {
        match err {
            BackendError::WorkerError(_) if self.stopped.is_stopped() => {
                self.release();
                Self::not_initialized(queries)
            }
            err => err,
        }
    }
}

#[async_trait]
impl DbBackend for SqliteBackend {
    async fn initialize(&mut self) -> Result<(), BackendError> {
        if self.connection.is_some() {
            tracing::debug!(db = %self.db_name, "initialize called twice; keeping connection");
            return Ok(());
        }

        // Subscribe before opening so a stop that lands mid-open is still observed.
        if let Some(previous) = self.stop_watcher.take() {
            previous.abort();
        }
        let (handoff_tx, handoff_rx) = oneshot::channel();
        self.stop_watcher = Some(tokio::spawn(release_on_stop(
            self.db_name.clone(),
            self.stopped.clone(),
            handoff_rx,
            Arc::clone(&self.logger),
        )));

        let conn = SqliteConnection::open(&self.location, &self.options).await?;
        tracing::debug!(db = %self.db_name, location = %self.location, "backend initialized");

        if self.stopped.is_stopped() || handoff_tx.send(conn.clone()).is_err() {
            conn.close();
            return Ok(());
        }
        self.connection = Some(conn);
        Ok(())
    }

    async fn exec_queries(
        &mut self,
        queries: &[Query],
        options: &ExecOptions,
    ) -> Result<Vec<QueryResult>, BackendError> {
        if self.stopped.is_stopped() {
            self.release();
        }
        let Some(conn) = self.connection.as_ref() else {
            return Err(Self::not_initialized(queries));
        };
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let jobs: Vec<StatementJob> = queries.iter().map(StatementJob::from).collect();
        let started = Instant::now();
        let outcome = conn.execute_queries(jobs).await;
        let results = match outcome {
            Ok(results) => results,
            Err(err) => return Err(self.classify_batch_error(err, queries)),
        };
        let elapsed = started.elapsed();

        if !options.log.suppress {
            self.logger.log_batch(&BatchLogEntry {
                db_name: &self.db_name,
                transaction_id: options.log.transaction_id.as_deref(),
                queries,
                elapsed,
            });
        }

        Ok(results)
    }
}

impl Drop for SqliteBackend {
    fn drop(&mut self) {
        if let Some(watcher) = self.stop_watcher.take() {
            watcher.abort();
        }
        self.release();
    }
}

impl fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("db_name", &self.db_name)
            .field("location", &self.location)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

/// Stop handler registered by `initialize`.
///
/// If no connection has been handed over by the time the signal fires, there is
/// nothing to release and the condition is reported rather than raised.
async fn release_on_stop(
    db_name: String,
    stopped: StopSignal,
    mut handoff: oneshot::Receiver<SqliteConnection>,
    logger: Arc<dyn QueryLogger>,
) {
    stopped.stopped().await;
    match handoff.try_recv() {
        Ok(conn) => {
            tracing::debug!(db = %db_name, "stop signal received; closing sqlite connection");
            conn.close();
        }
        Err(_) => logger.warn(&db_name, "Failed to stop DB, it is not initialized"),
    }
}
