use rusqlite::Connection;
use thiserror::Error;
use tracing::debug;

use super::convert::value_from_sql;
use crate::storage::table::{Column, Row, Schema, SqlType, Table, Value};

/// An engine-reported failure: syntax error, constraint violation,
/// unknown table or column. Always recovered at the dispatcher.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("SQL error: {0}")]
    Engine(#[from] rusqlite::Error),
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;

#[derive(Debug)]
pub enum QueryOutcome {
    /// A read-type statement produced rows.
    Rows(Table),
    /// A write-type statement affected this many rows.
    Affected(usize),
}

/// A statement is read-type exactly when its leading keyword is SELECT,
/// compared case-insensitively after stripping leading whitespace.
/// Everything else runs through the write path.
pub fn is_read_statement(sql: &str) -> bool {
    let keyword: String = sql
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    keyword.eq_ignore_ascii_case("select")
}

pub fn execute_sql(conn: &Connection, sql: &str) -> QueryResult<QueryOutcome> {
    if is_read_statement(sql) {
        debug!(sql, "executing read statement");
        let mut stmt = conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut result_rows: Vec<Row> = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(names.len());
            for i in 0..names.len() {
                values.push(value_from_sql(row.get_ref(i)?));
            }
            result_rows.push(Row::new(values));
        }

        let columns: Vec<Column> = names
            .iter()
            .enumerate()
            .map(|(i, name)| Column::new(name.clone(), result_type(&result_rows, i)))
            .collect();
        Ok(QueryOutcome::Rows(Table::with_rows(
            "result",
            Schema::new(columns),
            result_rows,
        )))
    } else {
        debug!(sql, "executing write statement");
        let affected = conn.execute(sql, [])?;
        Ok(QueryOutcome::Affected(affected))
    }
}

/// Result-set columns have no declared type; take the storage class of
/// the first non-null value, defaulting to TEXT.
fn result_type(rows: &[Row], index: usize) -> SqlType {
    rows.iter()
        .find_map(|row| match row.get(index) {
            Some(Value::Integer(_)) => Some(SqlType::Integer),
            Some(Value::Real(_)) => Some(SqlType::Real),
            Some(Value::Text(_)) => Some(SqlType::Text),
            _ => None,
        })
        .unwrap_or(SqlType::Text)
}
