use std::io::Cursor;

use csviz::repl::Repl;
use csviz::{CsvReader, Session};

/// Run a scripted session against a temp CSV and capture the output.
fn run_script(csv: &str, file_name: &str, script: &str) -> String {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(file_name);
    std::fs::write(&path, csv).unwrap();
    let session = Session::open(&path, &CsvReader::new()).unwrap();

    let mut output = Vec::new();
    Repl::new(session, Cursor::new(script.to_string()), &mut output)
        .run()
        .unwrap();
    String::from_utf8(output).unwrap()
}

const CITIES: &str = "city,population,area\nberlin,3600000,891.7\nparis,2100000,105.4\nmadrid,3300000,604.3\n";

#[test]
fn test_exit_ends_session() {
    let output = run_script(CITIES, "cities.csv", "EXIT\n");
    assert!(output.contains("commands:"));
    assert!(output.contains("exiting"));
}

#[test]
fn test_eof_ends_session() {
    let output = run_script(CITIES, "cities.csv", "");
    assert!(output.contains("cities_table> "));
}

#[test]
fn test_unknown_command_prints_hint() {
    let output = run_script(CITIES, "cities.csv", "FLY\nexit\n");
    assert!(output.contains("unknown command 'FLY'"));
    // The loop kept going: the exit message still appears.
    assert!(output.contains("exiting"));
}

#[test]
fn test_sql_select_prints_table() {
    let output = run_script(
        CITIES,
        "cities.csv",
        "sql SELECT city FROM cities_table ORDER BY population DESC\nexit\n",
    );
    assert!(output.contains("berlin"));
    assert!(output.contains("(3 rows)"));
}

#[test]
fn test_sql_without_query_prints_usage() {
    let output = run_script(CITIES, "cities.csv", "SQL\nexit\n");
    assert!(output.contains("usage: SQL <query>"));
}

#[test]
fn test_sql_error_is_recovered() {
    let output = run_script(
        CITIES,
        "cities.csv",
        "SQL SELECT nope FROM cities_table\nHEAD 1\nexit\n",
    );
    assert!(output.contains("SQL error"));
    // The session is still alive afterwards.
    assert!(output.contains("(1 rows)"));
}

#[test]
fn test_update_reflected_in_head_and_describe() {
    let output = run_script(
        CITIES,
        "cities.csv",
        "SQL UPDATE cities_table SET population = 0 WHERE city = 'paris'\nHEAD\nDESCRIBE\nexit\n",
    );
    assert!(output.contains("1 rows affected"));
    // paris now shows population 0 in the HEAD output, and DESCRIBE
    // is computed from the mutated contents.
    assert!(output.contains("paris  | 0"));
    assert!(output.contains("mean"));
}

#[test]
fn test_head_respects_count() {
    let output = run_script(CITIES, "cities.csv", "HEAD 2\nexit\n");
    assert!(output.contains("(2 rows)"));
}

#[test]
fn test_columns_lists_schema() {
    let output = run_script(CITIES, "cities.csv", "COLUMNS\nexit\n");
    assert!(output.contains("city TEXT"));
    assert!(output.contains("population INTEGER"));
    assert!(output.contains("area REAL"));
}

#[test]
fn test_describe_layout() {
    let output = run_script(CITIES, "cities.csv", "DESCRIBE\nexit\n");
    for stat in ["count", "unique", "top", "freq", "mean", "std", "min", "max"] {
        assert!(output.contains(stat), "missing stat row: {}", stat);
    }
}

#[test]
fn test_visualize_cancel_returns_to_prompt() {
    let output = run_script(CITIES, "cities.csv", "VISUALIZE\nBACK\nHEAD 1\nexit\n");
    assert!(output.contains("available columns: city, population, area"));
    assert!(output.contains("(1 rows)"));
}

#[test]
fn test_visualize_rejects_unknown_kind() {
    let output = run_script(CITIES, "cities.csv", "VISUALIZE\ndonut\nBACK\nexit\n");
    assert!(output.contains("invalid chart type"));
    assert!(output.contains("exiting"));
}

#[test]
fn test_visualize_unknown_column_stays_in_submenu() {
    let output = run_script(
        CITIES,
        "cities.csv",
        "VISUALIZE\nscatter\nnope\npopulation\nBACK\nexit\n",
    );
    assert!(output.contains("column 'nope' not found in table"));
    // Still in the submenu afterwards: the chart-type prompt repeats.
    let prompts = output.matches("chart type> ").count();
    assert!(prompts >= 2, "expected a re-prompt, got: {}", output);
}

#[test]
fn test_visualize_pie_with_numeric_labels_fails_cleanly() {
    let output = run_script(
        CITIES,
        "cities.csv",
        "VISUALIZE\npie\npopulation\narea\nBACK\nexit\n",
    );
    assert!(output.contains("column 'population' must be categorical"));
    assert!(output.contains("exiting"));
}

#[test]
fn test_visualize_bar_requires_numeric_y() {
    let output = run_script(
        CITIES,
        "cities.csv",
        "VISUALIZE\nbar\npopulation\ncity\nBACK\nexit\n",
    );
    assert!(output.contains("column 'city' must be numeric"));
}

#[test]
fn test_visualize_bad_bins() {
    let output = run_script(
        CITIES,
        "cities.csv",
        "VISUALIZE\nhistogram\npopulation\nlots\nBACK\nexit\n",
    );
    assert!(output.contains("bin count must be a positive integer"));
}

#[test]
fn test_visualize_eof_mid_prompt_is_clean() {
    // Input ends while the submenu is asking for a column.
    let output = run_script(CITIES, "cities.csv", "VISUALIZE\nbar\ncity\n");
    assert!(output.contains("y column (numeric)> "));
}
