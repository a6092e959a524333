pub mod csv;
pub mod table;

pub use csv::{CsvReader, RawFrame};
pub use table::{Column, Row, Schema, SqlType, Table, Value};
