use rusqlite::Connection;

use super::error::Result;
use crate::storage::table::{Column, Row};

/// CREATE TABLE statement for the synthesized schema. Every identifier
/// is double-quoted; the sanitizer guarantees validity, quoting keeps
/// reserved words and case intact.
pub fn create_table_sql(table: &str, columns: &[Column]) -> String {
    let defs: Vec<String> = columns
        .iter()
        .map(|c| format!("\"{}\" {}", c.name, c.sql_type))
        .collect();
    format!("CREATE TABLE \"{}\" ({})", table, defs.join(", "))
}

fn insert_sql(table: &str, column_count: usize) -> String {
    let params: Vec<String> = (1..=column_count).map(|i| format!("?{}", i)).collect();
    format!("INSERT INTO \"{}\" VALUES ({})", table, params.join(", "))
}

/// Create the table and bulk-load the typed rows in one transaction.
/// Missing cells arrive as `Value::Null` and are stored as SQL NULL.
pub fn synthesize(
    conn: &mut Connection,
    table: &str,
    columns: &[Column],
    rows: &[Row],
) -> Result<()> {
    conn.execute(&create_table_sql(table, columns), [])?;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&insert_sql(table, columns.len()))?;
        for row in rows {
            stmt.execute(rusqlite::params_from_iter(row.values.iter()))?;
        }
    }
    tx.commit()?;
    Ok(())
}
