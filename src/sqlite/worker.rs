//! Dedicated thread that owns the `rusqlite::Connection`.
//!
//! The async side only ever talks to it through a command channel, so the
//! connection is never touched from more than one thread and statements run in
//! the order they were sent.

mod channel;
mod connection;
mod dispatcher;
mod manager;

pub(crate) use channel::StatementJob;
pub use connection::SqliteConnection;
