use std::collections::HashSet;
use std::path::Path;

/// Core sanitization: trim, collapse every run of characters that are
/// not alphanumeric or `_` into a single underscore, and prefix an
/// underscore when the result would start with a digit. May return an
/// empty string; callers substitute a placeholder.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;
    for c in raw.trim().chars() {
        if c.is_alphanumeric() || c == '_' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Sanitize one header, falling back to a positional placeholder when
/// nothing survives sanitization.
pub fn column_name(raw: &str, index: usize) -> String {
    let name = sanitize_identifier(raw);
    if name.is_empty() {
        format!("column_{}", index)
    } else {
        name
    }
}

/// Sanitize a full header row, keeping names unique within the table.
/// Collisions are resolved case-insensitively (SQLite identifiers are
/// case-insensitive) by appending `_2`, `_3`, ... to later names.
pub fn column_names(headers: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(headers.len());
    for (index, raw) in headers.iter().enumerate() {
        let base = column_name(raw, index);
        let mut name = base.clone();
        let mut suffix = 2;
        while !seen.insert(name.to_lowercase()) {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }
    names
}

/// Derive the session table name from the source file: sanitized stem
/// plus a fixed suffix that keeps it clear of reserved words.
pub fn table_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let name = sanitize_identifier(stem);
    if name.trim_matches('_').is_empty() {
        "csv_data_table".to_string()
    } else {
        format!("{}_table", name)
    }
}
