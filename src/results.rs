//! Rows and per-query results returned by `exec_queries`.

mod query_result;
mod row;

pub use query_result::QueryResult;
pub use row::Row;
