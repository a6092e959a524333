use thiserror::Error;

use crate::storage::csv::CsvError;

/// Failures while establishing the session. These are the only fatal
/// errors in the program: the session never starts when loading fails.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] CsvError),
    #[error("CSV file has no columns")]
    EmptySchema,
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
