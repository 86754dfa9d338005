use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, Statement, params_from_iter};

use crate::results::QueryResult;
use crate::types::RowValues;

/// SQLite does not validate TEXT, so bytes that are not UTF-8 come back as a blob
/// rather than being altered.
fn extract_value(value: ValueRef<'_>) -> RowValues {
    match value {
        ValueRef::Null => RowValues::Null,
        ValueRef::Integer(i) => RowValues::Int(i),
        ValueRef::Real(f) => RowValues::Float(f),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => RowValues::Text(text.to_owned()),
            Err(_) => RowValues::Blob(bytes.to_vec()),
        },
        ValueRef::Blob(b) => RowValues::Blob(b.to_vec()),
    }
}

/// Step a prepared statement to completion, collecting every row it yields.
///
/// Statements that return no columns (DML, DDL, `BEGIN`) still run; they simply
/// produce an empty result.
pub(crate) fn build_query_result(
    stmt: &mut Statement<'_>,
    params: &[Value],
) -> rusqlite::Result<QueryResult> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();
    let mut result = QueryResult::with_columns(column_names);

    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            values.push(extract_value(row.get_ref(i)?));
        }
        result.push_row(values);
    }

    Ok(result)
}

/// Prepare and run one statement: the execute-and-fetch primitive the backend needs.
pub(crate) fn select(
    conn: &Connection,
    sql: &str,
    params: &[Value],
) -> rusqlite::Result<QueryResult> {
    let mut stmt = conn.prepare(sql)?;
    build_query_result(&mut stmt, params)
}
