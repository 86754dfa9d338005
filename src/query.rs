use crate::types::RowValues;

/// A SQL statement and its positional parameters.
///
/// Immutable once built; a query has no identity beyond its position in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    text: String,
    values: Vec<RowValues>,
}

impl Query {
    /// Create a query with positional (`?`) parameters.
    pub fn new(text: impl Into<String>, values: Vec<RowValues>) -> Self {
        Self {
            text: text.into(),
            values,
        }
    }

    /// Create a query with no parameters.
    pub fn without_params(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }
}

/// Space-joined SQL text of a batch, used in diagnostics and log lines.
#[must_use]
pub fn batch_text(queries: &[Query]) -> String {
    queries
        .iter()
        .map(Query::text)
        .collect::<Vec<_>>()
        .join(" ")
}
