use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;

use crate::storage::table::{SqlType, Value};

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Real(f) => ToSqlOutput::from(*f),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Null => ToSqlOutput::from(rusqlite::types::Null),
        })
    }
}

/// Decode one SQLite cell into the in-memory value model. BLOBs cannot
/// be produced by the loader but a later write query may store one;
/// they render as a placeholder.
pub fn value_from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(_) => Value::Text("[BLOB]".to_string()),
    }
}

/// Map a declared column type back to the storage class, following
/// SQLite's affinity rules for the declarations this crate emits plus
/// the common spellings a write query might introduce.
pub fn sql_type_from_decl(decl: &str) -> SqlType {
    let decl = decl.to_uppercase();
    if decl.contains("INT") {
        SqlType::Integer
    } else if decl.contains("REAL") || decl.contains("FLOA") || decl.contains("DOUB") {
        SqlType::Real
    } else {
        SqlType::Text
    }
}
