use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

/// Tokens treated as the missing-value marker, compared after trimming
/// and case-insensitively.
const MISSING_TOKENS: [&str; 3] = ["null", "na", "n/a"];

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
    #[error("empty CSV file")]
    EmptyFile,
}

/// Raw parsed CSV contents: header names and row-major cells, with
/// missing values already collapsed to `None`.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawFrame {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterate one column's cells top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = Option<&str>> {
        self.rows.iter().map(move |row| {
            row.get(index).and_then(|cell| cell.as_deref())
        })
    }
}

pub struct CsvReader {
    delimiter: u8,
    has_header: bool,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvReader {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter as u8;
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn read_file(&self, path: &Path) -> Result<RawFrame, CsvError> {
        let file = File::open(path)?;
        self.read_from(file)
    }

    pub fn read_from<R: Read>(&self, reader: R) -> Result<RawFrame, CsvError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_header)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut headers: Vec<String> = if self.has_header {
            reader.headers()?.iter().map(|h| h.to_string()).collect()
        } else {
            Vec::new()
        };

        let mut rows: Vec<Vec<Option<String>>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            if headers.is_empty() {
                // Headerless input: width comes from the first record and
                // names are left blank for the sanitizer's placeholders.
                headers = vec![String::new(); record.len()];
            }
            rows.push(record.iter().map(parse_cell).collect());
        }

        if headers.is_empty() {
            return Err(CsvError::EmptyFile);
        }

        Ok(RawFrame { headers, rows })
    }
}

fn parse_cell(cell: &str) -> Option<String> {
    if is_missing(cell) {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Whether a raw cell carries the distinguished missing-value marker.
pub fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || MISSING_TOKENS.iter().any(|t| cell.eq_ignore_ascii_case(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_simple_csv() {
        let data = "id,name,age\n1,Alice,30\n2,Bob,25";
        let frame = CsvReader::new().read_from(Cursor::new(data)).unwrap();

        assert_eq!(frame.headers, vec!["id", "name", "age"]);
        assert_eq!(frame.row_count(), 2);
        assert_eq!(frame.rows[0][1], Some("Alice".to_string()));
    }

    #[test]
    fn test_quoted_fields() {
        let data = "name,description\n\"John Doe\",\"A \"\"quoted\"\" value\"";
        let frame = CsvReader::new().read_from(Cursor::new(data)).unwrap();

        assert_eq!(frame.row_count(), 1);
        assert_eq!(frame.rows[0][0], Some("John Doe".to_string()));
        assert_eq!(frame.rows[0][1], Some("A \"quoted\" value".to_string()));
    }

    #[test]
    fn test_missing_markers() {
        let data = "a,b\n1,\n,2\nnull,NA";
        let frame = CsvReader::new().read_from(Cursor::new(data)).unwrap();

        assert_eq!(frame.rows[0][1], None);
        assert_eq!(frame.rows[1][0], None);
        assert_eq!(frame.rows[2][0], None);
        assert_eq!(frame.rows[2][1], None);
    }

    #[test]
    fn test_custom_delimiter() {
        let data = "a;b;c\n1;2;3";
        let frame = CsvReader::new()
            .with_delimiter(';')
            .read_from(Cursor::new(data))
            .unwrap();

        assert_eq!(frame.column_count(), 3);
    }

    #[test]
    fn test_headerless_input() {
        let data = "1,x\n2,y";
        let frame = CsvReader::new()
            .with_header(false)
            .read_from(Cursor::new(data))
            .unwrap();

        assert_eq!(frame.headers, vec!["", ""]);
        assert_eq!(frame.row_count(), 2);
    }

    #[test]
    fn test_empty_input() {
        let err = CsvReader::new().read_from(Cursor::new("")).unwrap_err();
        assert!(matches!(err, CsvError::EmptyFile));
    }

    #[test]
    fn test_column_iterator() {
        let data = "a,b\n1,x\n,y\n3,z";
        let frame = CsvReader::new().read_from(Cursor::new(data)).unwrap();

        let col: Vec<Option<&str>> = frame.column(0).collect();
        assert_eq!(col, vec![Some("1"), None, Some("3")]);
    }

    #[test]
    fn test_is_missing_tokens() {
        assert!(is_missing(""));
        assert!(is_missing("  "));
        assert!(is_missing("NULL"));
        assert!(is_missing("n/a"));
        assert!(!is_missing("0"));
        assert!(!is_missing("none"));
    }
}
