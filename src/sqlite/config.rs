use std::sync::Arc;
use std::time::Duration;

use rusqlite::Connection;

use crate::backend::{LocationResolver, SqliteBackendFactory};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection setup applied when a backend opens its database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOptions {
    /// How long SQLite waits on a locked database before returning `SQLITE_BUSY`.
    pub busy_timeout: Duration,
    /// Switch the database to write-ahead logging on open. Off by default, which
    /// keeps a database to a single file between transactions.
    pub wal: bool,
    /// Enforce foreign key constraints on this connection.
    pub foreign_keys: bool,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            wal: false,
            foreign_keys: false,
        }
    }
}

impl BackendOptions {
    #[must_use]
    pub fn builder() -> BackendOptionsBuilder {
        BackendOptionsBuilder::default()
    }

    /// Apply pragmas to a freshly opened connection.
    ///
    /// `Connection::open` does not read the file, so the header is checked here: a
    /// corrupt or non-database file fails at setup rather than on the first query.
    pub(crate) fn apply(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.busy_timeout(self.busy_timeout)?;
        let _schema_version: i64 = conn.query_row("PRAGMA schema_version", [], |row| row.get(0))?;
        if self.wal {
            // In-memory databases answer "memory"; either way the pragma must succeed.
            let _mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        }
        conn.pragma_update(None, "foreign_keys", self.foreign_keys)?;
        Ok(())
    }
}

/// Fluent builder for [`BackendOptions`].
#[derive(Debug, Clone, Default)]
pub struct BackendOptionsBuilder {
    opts: BackendOptions,
}

impl BackendOptionsBuilder {
    #[must_use]
    pub fn busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.opts.busy_timeout = busy_timeout;
        self
    }

    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts.wal = wal;
        self
    }

    #[must_use]
    pub fn foreign_keys(mut self, foreign_keys: bool) -> Self {
        self.opts.foreign_keys = foreign_keys;
        self
    }

    #[must_use]
    pub fn finish(self) -> BackendOptions {
        self.opts
    }

    /// Build a backend factory that resolves database names through `resolve`.
    #[must_use]
    pub fn build<F>(self, resolve: F) -> SqliteBackendFactory
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let resolver: LocationResolver = Arc::new(resolve);
        SqliteBackendFactory::new(resolver).with_options(self.finish())
    }
}
