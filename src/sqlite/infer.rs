use crate::storage::table::{SqlType, Value};

/// Decide a column's storage type from its raw cells, ignoring what the
/// carrier thought the cells were. Missing cells are dropped first; a
/// column with nothing left defaults to TEXT. The remaining cells must
/// *all* satisfy a type for it to be chosen: one non-numeric value
/// anywhere forces TEXT, with no majority fallback. Boolean-looking
/// tokens are deliberately not inferred and land in TEXT.
pub fn infer_column<'a, I>(cells: I) -> SqlType
where
    I: Iterator<Item = Option<&'a str>>,
{
    let mut saw_value = false;
    let mut all_integer = true;
    let mut all_real = true;

    for cell in cells.flatten() {
        saw_value = true;
        if all_integer && !is_integer_literal(cell) {
            all_integer = false;
        }
        if all_real && cell.trim().parse::<f64>().is_err() {
            all_real = false;
        }
        if !all_real {
            break;
        }
    }

    if !saw_value {
        SqlType::Text
    } else if all_integer {
        SqlType::Integer
    } else if all_real {
        SqlType::Real
    } else {
        SqlType::Text
    }
}

/// Optional sign followed by digits only, within i64 range. Values with
/// a decimal point, an exponent, or digits beyond 64-bit range fail
/// here and fall through to the REAL check.
fn is_integer_literal(cell: &str) -> bool {
    cell.trim().parse::<i64>().is_ok()
}

/// Convert one raw cell to its typed value under the column's inferred
/// type. Missing cells become NULL; by construction every remaining
/// cell parses, but a mismatch still degrades to NULL rather than
/// panicking.
pub fn parse_value(cell: Option<&str>, sql_type: SqlType) -> Value {
    let Some(cell) = cell else {
        return Value::Null;
    };
    let cell = cell.trim();
    match sql_type {
        SqlType::Integer => cell.parse::<i64>().map(Value::Integer).unwrap_or(Value::Null),
        SqlType::Real => cell.parse::<f64>().map(Value::Real).unwrap_or(Value::Null),
        SqlType::Text => Value::Text(cell.to_string()),
    }
}
