//! Async SQLite backend adapter.
//!
//! A [`SqliteBackendFactory`] turns a logical database name into a [`SqliteBackend`]
//! that owns one connection on a dedicated worker thread. The caller initializes it
//! once, submits ordered batches of parameterized queries, and shuts it down by
//! firing the [`StopSignal`] it was created with.
//!
//! ```rust,no_run
//! use sqlite_backend::prelude::*;
//!
//! # async fn run() -> Result<(), BackendError> {
//! let factory = BackendOptions::builder().build(|name| format!("{name}.db"));
//! let stopped = StopSignal::new();
//! let mut db = factory.create("helloWorld", stopped.clone());
//! db.initialize().await?;
//!
//! let results = db
//!     .exec_queries(
//!         &[Query::new("SELECT ? AS greeting", vec![RowValues::Text("hi".into())])],
//!         &ExecOptions::default(),
//!     )
//!     .await?;
//! assert_eq!(results.len(), 1);
//!
//! stopped.stop();
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod error;
pub mod logging;
pub mod options;
pub mod prelude;
pub mod query;
pub mod results;
pub mod sqlite;
pub mod stop;
pub mod types;

pub use backend::{BackendFactory, DbBackend, LocationResolver, SqliteBackend, SqliteBackendFactory};
pub use error::BackendError;
pub use stop::StopSignal;
