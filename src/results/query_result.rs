use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::row::Row;
use crate::types::RowValues;

/// Rows produced by a single query, built fresh for every execution.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct QueryResult {
    #[serde(skip)]
    column_names: Arc<Vec<String>>,
    #[serde(skip)]
    column_index: Arc<HashMap<String, usize>>,
    rows: Vec<Row>,
}

impl QueryResult {
    pub(crate) fn with_columns(column_names: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(column_names.len());
        for (i, name) in column_names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Self {
            column_names: Arc::new(column_names),
            column_index: Arc::new(index),
            rows: Vec::new(),
        }
    }

    pub(crate) fn push_row(&mut self, values: Vec<RowValues>) {
        self.rows.push(Row::new(
            Arc::clone(&self.column_names),
            Arc::clone(&self.column_index),
            values,
        ));
    }

    /// Column names reported by the statement; empty for DML and DDL.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }
}

impl IntoIterator for QueryResult {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
