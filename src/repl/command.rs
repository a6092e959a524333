pub const DEFAULT_HEAD_ROWS: usize = 5;

/// One parsed command line. Keeping this a closed sum type (with an
/// explicit Unknown variant) keeps dispatch in one match instead of
/// prefix checks scattered through the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sql(String),
    Visualize,
    Columns,
    Describe,
    Head(usize),
    Help,
    Exit,
    Unknown(String),
}

impl Command {
    /// Parse a raw input line. The leading keyword is case-insensitive;
    /// the rest of the line is the argument. Returns None for blank
    /// lines. A non-numeric HEAD argument falls back to the default.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((k, r)) => (k, r.trim()),
            None => (line, ""),
        };

        Some(match keyword.to_ascii_uppercase().as_str() {
            "SQL" => Command::Sql(rest.to_string()),
            "VISUALIZE" => Command::Visualize,
            "COLUMNS" => Command::Columns,
            "DESCRIBE" => Command::Describe,
            "HEAD" => Command::Head(rest.parse().unwrap_or(DEFAULT_HEAD_ROWS)),
            "HELP" => Command::Help,
            "EXIT" => Command::Exit,
            _ => Command::Unknown(keyword.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_is_case_insensitive() {
        assert_eq!(Command::parse("exit"), Some(Command::Exit));
        assert_eq!(Command::parse("Help"), Some(Command::Help));
        assert_eq!(Command::parse("VISUALIZE"), Some(Command::Visualize));
        assert_eq!(Command::parse("columns"), Some(Command::Columns));
        assert_eq!(Command::parse("describe"), Some(Command::Describe));
    }

    #[test]
    fn test_sql_keeps_query_text() {
        assert_eq!(
            Command::parse("sql SELECT * FROM t WHERE x = 'HEAD'"),
            Some(Command::Sql("SELECT * FROM t WHERE x = 'HEAD'".to_string()))
        );
        assert_eq!(Command::parse("SQL"), Some(Command::Sql(String::new())));
    }

    #[test]
    fn test_head_argument() {
        assert_eq!(Command::parse("HEAD 10"), Some(Command::Head(10)));
        assert_eq!(Command::parse("head"), Some(Command::Head(5)));
        assert_eq!(Command::parse("HEAD ten"), Some(Command::Head(5)));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            Command::parse("DROP TABLE t"),
            Some(Command::Unknown("DROP".to_string()))
        );
    }
}
