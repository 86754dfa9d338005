use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread;

use rusqlite::Connection;
use tokio::sync::oneshot;

use crate::error::BackendError;
use crate::results::QueryResult;
use crate::sqlite::config::BackendOptions;

use super::channel::{Command, StatementJob};
use super::dispatcher::run_sqlite_worker;

// Thread names must not contain NUL, so they carry an id rather than the location.
static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(1);

pub(super) struct SqliteWorker {
    sender: Sender<Command>,
    worker_id: u64,
    location: String,
}

impl SqliteWorker {
    /// Spawn the worker thread and open the database on it.
    ///
    /// Resolves once the connection is open and configured, or with the open error.
    pub(super) async fn open(
        location: &str,
        options: &BackendOptions,
    ) -> Result<Self, BackendError> {
        let (sender, receiver) = mpsc::channel::<Command>();
        let (ready_tx, ready_rx) = oneshot::channel::<Result<(), BackendError>>();
        let thread_location = location.to_owned();
        let options = options.clone();
        let worker_id = NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed);

        thread::Builder::new()
            .name(format!("sqlite-worker-{worker_id}"))
            .spawn(move || {
                let conn = match open_connection(&thread_location, &options) {
                    Ok(conn) => conn,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                if ready_tx.send(Ok(())).is_err() {
                    return;
                }
                run_sqlite_worker(&conn, &receiver);
                tracing::debug!(worker_id, location = %thread_location, "sqlite worker exiting");
            })
            .map_err(|err| {
                BackendError::WorkerError(format!("failed to spawn SQLite worker thread: {err}"))
            })?;

        ready_rx.await.map_err(|_| {
            BackendError::WorkerError("SQLite worker exited before opening the database".into())
        })??;

        Ok(Self {
            sender,
            worker_id,
            location: location.to_owned(),
        })
    }

    pub(super) fn worker_id(&self) -> u64 {
        self.worker_id
    }

    pub(super) fn location(&self) -> &str {
        &self.location
    }

    pub(super) async fn execute_queries(
        &self,
        jobs: Vec<StatementJob>,
    ) -> Result<Vec<QueryResult>, BackendError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::ExecuteQueries {
                jobs,
                respond_to: tx,
            })
            .map_err(|_| BackendError::WorkerError("SQLite worker closed".into()))?;
        rx.await.map_err(|_| {
            BackendError::WorkerError("SQLite worker dropped while executing queries".into())
        })?
    }

    /// Ask the thread to exit once queued commands have drained.
    pub(super) fn shutdown(&self) {
        let _ = self.sender.send(Command::Shutdown);
    }
}

impl Drop for SqliteWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn open_connection(location: &str, options: &BackendOptions) -> Result<Connection, BackendError> {
    let connection_error = |source| BackendError::ConnectionError {
        location: location.to_owned(),
        source,
    };
    let conn = Connection::open(location).map_err(connection_error)?;
    options.apply(&conn).map_err(connection_error)?;
    tracing::debug!(location, "sqlite connection opened");
    Ok(conn)
}
