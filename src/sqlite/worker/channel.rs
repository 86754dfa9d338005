use tokio::sync::oneshot;

use crate::error::BackendError;
use crate::query::Query;
use crate::results::QueryResult;
use crate::sqlite::params::Params;

/// One statement of a batch, converted and ready to cross to the worker thread.
#[derive(Debug, Clone)]
pub(crate) struct StatementJob {
    pub(crate) sql: String,
    pub(crate) params: Params,
}

impl From<&Query> for StatementJob {
    fn from(query: &Query) -> Self {
        Self {
            sql: query.text().to_owned(),
            params: Params::convert(query.values()),
        }
    }
}

pub(super) type BatchResponse = Result<Vec<QueryResult>, BackendError>;

pub(super) enum Command {
    ExecuteQueries {
        jobs: Vec<StatementJob>,
        respond_to: oneshot::Sender<BatchResponse>,
    },
    Shutdown,
}
