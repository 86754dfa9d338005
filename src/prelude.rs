//! Convenient imports for common functionality.

pub use crate::backend::{
    BackendFactory, DbBackend, LocationResolver, SqliteBackend, SqliteBackendFactory,
};
pub use crate::error::BackendError;
pub use crate::logging::{BatchLogEntry, MemoryLogger, QueryLogger, TracingLogger};
pub use crate::options::{ExecOptions, LogOptions};
pub use crate::query::Query;
pub use crate::results::{QueryResult, Row};
pub use crate::sqlite::{BackendOptions, BackendOptionsBuilder};
pub use crate::stop::StopSignal;
pub use crate::types::RowValues;
