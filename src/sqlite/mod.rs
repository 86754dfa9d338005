// SQLite module - the embedded engine behind `SqliteBackend`
//
// - config: connection setup (pragmas, busy timeout) and the options builder
// - params: conversion from `RowValues` to rusqlite values
// - query: execute-and-fetch, building a `QueryResult` from a statement
// - worker: dedicated thread owning the connection

pub mod config;
pub mod params;
pub(crate) mod query;
pub mod worker;

pub use config::{BackendOptions, BackendOptionsBuilder};
pub use worker::SqliteConnection;
