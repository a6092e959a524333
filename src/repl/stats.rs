use std::collections::HashMap;

use crate::storage::table::{Column, Row, Schema, SqlType, Table, Value};

const STAT_NAMES: [&str; 11] = [
    "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max",
];

/// Summary statistics over the current table contents, one column of
/// output per source column: count/mean/std/min/quartiles/max for
/// numeric columns, count/unique/top/freq for text columns. Cells that
/// do not apply are NULL, so the combined layout matches the familiar
/// describe-all table.
pub fn describe(table: &Table) -> Table {
    let mut out_columns = vec![Column::new("stat", SqlType::Text)];
    let mut stat_columns: Vec<Vec<Value>> = Vec::with_capacity(table.column_count());

    for (index, column) in table.schema.columns.iter().enumerate() {
        out_columns.push(Column::new(column.name.clone(), SqlType::Text));
        if column.sql_type.is_numeric() {
            stat_columns.push(numeric_stats(table, index));
        } else {
            stat_columns.push(text_stats(table, index));
        }
    }

    let rows = STAT_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut values = Vec::with_capacity(out_columns.len());
            values.push(Value::Text(name.to_string()));
            for stats in &stat_columns {
                values.push(stats[i].clone());
            }
            Row::new(values)
        })
        .collect();

    Table::with_rows("describe", Schema::new(out_columns), rows)
}

fn numeric_stats(table: &Table, index: usize) -> Vec<Value> {
    let mut values: Vec<f64> = table
        .iter()
        .filter_map(|row| row.get(index).and_then(Value::as_real))
        .collect();
    let n = values.len();

    if n == 0 {
        let mut stats = vec![Value::Null; STAT_NAMES.len()];
        stats[0] = Value::Integer(0);
        return stats;
    }

    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        Value::Real(var.sqrt())
    } else {
        Value::Null
    };

    vec![
        Value::Integer(n as i64),
        Value::Null, // unique
        Value::Null, // top
        Value::Null, // freq
        Value::Real(mean),
        std,
        Value::Real(values[0]),
        Value::Real(quantile(&values, 0.25)),
        Value::Real(quantile(&values, 0.5)),
        Value::Real(quantile(&values, 0.75)),
        Value::Real(values[n - 1]),
    ]
}

fn text_stats(table: &Table, index: usize) -> Vec<Value> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut total = 0usize;
    for row in table.iter() {
        let Some(value) = row.get(index) else { continue };
        if value.is_null() {
            continue;
        }
        let order = counts.len();
        let entry = counts.entry(value.to_string()).or_insert((0, order));
        entry.0 += 1;
        total += 1;
    }

    let unique = counts.len();
    // Highest frequency wins; ties go to the value seen first.
    let top = counts
        .iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
        .map(|(value, (freq, _))| (value.clone(), *freq));

    let (top_value, freq_value) = match top {
        Some((value, freq)) => (Value::Text(value), Value::Integer(freq as i64)),
        None => (Value::Null, Value::Null),
    };

    vec![
        Value::Integer(total as i64),
        Value::Integer(unique as i64),
        top_value,
        freq_value,
        Value::Null, // mean
        Value::Null, // std
        Value::Null, // min
        Value::Null, // 25%
        Value::Null, // 50%
        Value::Null, // 75%
        Value::Null, // max
    ]
}

/// Linear-interpolation quantile over an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
