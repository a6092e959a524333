use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use super::error::{Result, SessionError};
use super::query::{self, QueryOutcome, QueryResult};
use super::{convert, infer, sanitize, schema};
use crate::storage::csv::CsvReader;
use crate::storage::table::{Column, Row, Schema, Table};

/// The session state: the live table's name, the one database
/// connection, and the immutable snapshot of the data as first loaded.
/// The connection is released when the session is dropped, on every
/// exit path.
pub struct Session {
    table_name: String,
    conn: Connection,
    snapshot: Table,
}

impl Session {
    /// Load a CSV into a fresh in-memory database: sanitize headers,
    /// infer per-column types from the values, create the table, and
    /// bulk-insert the rows with missing cells as NULL.
    pub fn open(path: &Path, reader: &CsvReader) -> Result<Self> {
        let frame = reader.read_file(path)?;
        if frame.column_count() == 0 {
            return Err(SessionError::EmptySchema);
        }

        let table_name = sanitize::table_name(path);
        let columns: Vec<Column> = sanitize::column_names(&frame.headers)
            .into_iter()
            .enumerate()
            .map(|(i, name)| Column::new(name, infer::infer_column(frame.column(i))))
            .collect();

        let rows: Vec<Row> = frame
            .rows
            .iter()
            .map(|raw| {
                let values = raw
                    .iter()
                    .zip(&columns)
                    .map(|(cell, col)| infer::parse_value(cell.as_deref(), col.sql_type))
                    .collect();
                Row::new(values)
            })
            .collect();

        let mut conn = Connection::open_in_memory()?;
        schema::synthesize(&mut conn, &table_name, &columns, &rows)?;
        info!(
            table = %table_name,
            columns = columns.len(),
            rows = rows.len(),
            "schema synthesized"
        );

        let snapshot = Table::with_rows(table_name.clone(), Schema::new(columns), rows);
        Ok(Self {
            table_name,
            conn,
            snapshot,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The data as first loaded. Never mutated; write queries only
    /// touch the live table.
    pub fn snapshot(&self) -> &Table {
        &self.snapshot
    }

    pub fn execute_sql(&self, sql: &str) -> QueryResult<QueryOutcome> {
        query::execute_sql(&self.conn, sql)
    }

    /// Current schema of the live table, straight from engine metadata
    /// so columns added or dropped by write queries are reflected.
    pub fn columns(&self) -> QueryResult<Vec<Column>> {
        let sql = format!("PRAGMA table_info(\"{}\")", self.table_name);
        let mut stmt = self.conn.prepare(&sql)?;
        let columns = stmt
            .query_map([], |row| {
                let name: String = row.get(1)?;
                let decl: String = row.get(2)?;
                Ok(Column::new(name, convert::sql_type_from_decl(&decl)))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// The full current contents of the live table.
    pub fn fetch_all(&self) -> QueryResult<Table> {
        let sql = format!("SELECT * FROM \"{}\"", self.table_name);
        self.select_current(&sql)
    }

    /// The first `n` rows of the current contents.
    pub fn head(&self, n: usize) -> QueryResult<Table> {
        let sql = format!("SELECT * FROM \"{}\" LIMIT {}", self.table_name, n);
        self.select_current(&sql)
    }

    fn select_current(&self, sql: &str) -> QueryResult<Table> {
        let columns = self.columns()?;
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = Vec::new();
        let mut result = stmt.query([])?;
        while let Some(row) = result.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                values.push(convert::value_from_sql(row.get_ref(i)?));
            }
            rows.push(Row::new(values));
        }
        Ok(Table::with_rows(
            self.table_name.clone(),
            Schema::new(columns),
            rows,
        ))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(table = %self.table_name, "releasing database connection");
    }
}
