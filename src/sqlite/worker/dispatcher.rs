use std::sync::mpsc::Receiver;

use rusqlite::Connection;

use crate::error::BackendError;
use crate::results::QueryResult;
use crate::sqlite::query::select;

use super::channel::{BatchResponse, Command, StatementJob};

pub(super) fn run_sqlite_worker(conn: &Connection, receiver: &Receiver<Command>) {
    while let Ok(command) = receiver.recv() {
        match command {
            Command::Shutdown => break,
            Command::ExecuteQueries { jobs, respond_to } => {
                // The caller may have given up waiting; the batch has still run.
                let _ = respond_to.send(execute_queries(conn, &jobs));
            }
        }
    }
}

/// Run jobs in order, stopping at the first failure. Nothing is rolled back.
fn execute_queries(conn: &Connection, jobs: &[StatementJob]) -> BatchResponse {
    let mut results: Vec<QueryResult> = Vec::with_capacity(jobs.len());
    for job in jobs {
        let result = select(conn, &job.sql, job.params.as_values()).map_err(|source| {
            BackendError::QueryExecutionError {
                query: job.sql.clone(),
                source,
            }
        })?;
        results.push(result);
    }
    Ok(results)
}
