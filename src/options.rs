use serde::{Deserialize, Serialize};

/// Per-call options for [`exec_queries`](crate::backend::DbBackend::exec_queries).
///
/// Deserializes from the camelCase shape database clients send:
/// ```rust
/// use sqlite_backend::prelude::*;
///
/// let opts: ExecOptions =
///     serde_json::from_str(r#"{"log":{"suppress":false,"transactionId":"a1b2c3d4"}}"#).unwrap();
/// assert_eq!(opts.log.transaction_id.as_deref(), Some("a1b2c3d4"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecOptions {
    pub log: LogOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogOptions {
    /// Skip the batch timing line entirely.
    pub suppress: bool,
    /// Correlates a batch with a logical transaction in the log line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

impl ExecOptions {
    /// Options that emit no batch log line.
    #[must_use]
    pub fn suppressed() -> Self {
        Self {
            log: LogOptions {
                suppress: true,
                transaction_id: None,
            },
        }
    }

    #[must_use]
    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.log.transaction_id = Some(transaction_id.into());
        self
    }
}
