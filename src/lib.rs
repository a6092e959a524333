pub mod cli;
pub mod repl;
pub mod sqlite;
pub mod storage;
pub mod viz;

pub use sqlite::session::Session;
pub use storage::csv::CsvReader;
pub use storage::table::{Column, Row, Schema, SqlType, Table, Value};
