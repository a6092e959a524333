use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::debug;

use super::command::Command;
use super::stats;
use crate::sqlite::query::QueryOutcome;
use crate::sqlite::session::Session;
use crate::storage::table::Table;
use crate::viz::{self, render, Chart, ChartKind, VizError, DEFAULT_HISTOGRAM_BINS};

enum Flow {
    Continue,
    Exit,
}

/// The interactive command loop. Generic over input and output so
/// whole sessions can be scripted in tests; the binary wires it to
/// stdin/stdout. Owns the session, and with it the database
/// connection, which is released when the loop ends however it ends.
pub struct Repl<R, W> {
    session: Session,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(session: Session, input: R, output: W) -> Self {
        Self {
            session,
            input,
            output,
        }
    }

    pub fn run(mut self) -> io::Result<()> {
        self.print_help()?;
        loop {
            write!(self.output, "{}> ", self.session.table_name())?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                // EOF behaves as EXIT.
                writeln!(self.output)?;
                break;
            };
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            debug!(?command, "dispatching");
            if let Flow::Exit = self.dispatch(command)? {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Sql(sql) if sql.is_empty() => {
                writeln!(self.output, "usage: SQL <query>")?;
            }
            Command::Sql(sql) => self.run_sql(&sql)?,
            Command::Visualize => self.visualize()?,
            Command::Columns => self.show_columns()?,
            Command::Describe => self.show_describe()?,
            Command::Head(n) => self.show_head(n)?,
            Command::Help => self.print_help()?,
            Command::Exit => {
                writeln!(self.output, "exiting")?;
                return Ok(Flow::Exit);
            }
            Command::Unknown(keyword) => {
                writeln!(
                    self.output,
                    "unknown command '{}'; type HELP for the command list",
                    keyword
                )?;
            }
        }
        Ok(Flow::Continue)
    }

    fn run_sql(&mut self, sql: &str) -> io::Result<()> {
        match self.session.execute_sql(sql) {
            Ok(QueryOutcome::Rows(table)) => write_table(&mut self.output, &table)?,
            Ok(QueryOutcome::Affected(n)) => writeln!(self.output, "{} rows affected", n)?,
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        Ok(())
    }

    fn show_columns(&mut self) -> io::Result<()> {
        match self.session.columns() {
            Ok(columns) => {
                writeln!(self.output, "columns in '{}':", self.session.table_name())?;
                for column in columns {
                    writeln!(self.output, "  {} {}", column.name, column.sql_type)?;
                }
            }
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        Ok(())
    }

    fn show_describe(&mut self) -> io::Result<()> {
        match self.session.fetch_all() {
            Ok(table) if table.row_count() == 0 => {
                writeln!(self.output, "table is empty, nothing to describe")?;
            }
            Ok(table) => write_table(&mut self.output, &stats::describe(&table))?,
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        Ok(())
    }

    fn show_head(&mut self, n: usize) -> io::Result<()> {
        match self.session.head(n) {
            Ok(table) => write_table(&mut self.output, &table)?,
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        Ok(())
    }

    /// The visualization submenu. A validation failure re-prompts for
    /// another chart; a successful hand-off to the renderer (or BACK,
    /// or EOF) returns to the main prompt. The table contents are
    /// fetched on entry, so charts always reflect prior writes.
    fn visualize(&mut self) -> io::Result<()> {
        let table = match self.session.fetch_all() {
            Ok(table) => table,
            Err(e) => {
                writeln!(self.output, "{}", e)?;
                return Ok(());
            }
        };
        if table.row_count() == 0 {
            writeln!(self.output, "table is empty, nothing to visualize")?;
            return Ok(());
        }

        writeln!(
            self.output,
            "available columns: {}",
            table.schema.column_names().join(", ")
        )?;
        loop {
            writeln!(
                self.output,
                "chart types: BAR, HISTOGRAM, SCATTER, PIE, LINE (BACK to cancel)"
            )?;
            let Some(choice) = self.prompt("chart type> ")? else {
                return Ok(());
            };
            if choice.trim().eq_ignore_ascii_case("back") {
                return Ok(());
            }
            let Some(kind) = ChartKind::parse(&choice) else {
                writeln!(self.output, "invalid chart type")?;
                continue;
            };

            match self.build_chart(kind, &table)? {
                None => return Ok(()),
                Some(Ok(chart)) => {
                    let file = format!("{}_{}.svg", self.session.table_name(), kind.name());
                    match render::render_svg(&chart, Path::new(&file)) {
                        Ok(()) => writeln!(self.output, "chart written to {}", file)?,
                        Err(e) => writeln!(self.output, "{}", e)?,
                    }
                    return Ok(());
                }
                Some(Err(e)) => {
                    writeln!(self.output, "{}", e)?;
                    continue;
                }
            }
        }
    }

    /// Prompt for the columns and parameters a chart kind needs, then
    /// build the validated request. Outer None means EOF mid-prompt.
    fn build_chart(
        &mut self,
        kind: ChartKind,
        table: &Table,
    ) -> io::Result<Option<Result<Chart, VizError>>> {
        let chart = match kind {
            ChartKind::Bar => {
                let Some(x) = self.prompt("x column (categories)> ")? else {
                    return Ok(None);
                };
                let Some(y) = self.prompt("y column (numeric)> ")? else {
                    return Ok(None);
                };
                viz::bar(table, x.trim(), y.trim())
            }
            ChartKind::Histogram => {
                let Some(column) = self.prompt("column (numeric)> ")? else {
                    return Ok(None);
                };
                let Some(bins) = self.prompt("bins (default 10)> ")? else {
                    return Ok(None);
                };
                match parse_bins(bins.trim()) {
                    Ok(bins) => viz::histogram(table, column.trim(), bins),
                    Err(e) => Err(e),
                }
            }
            ChartKind::Scatter => {
                let Some(x) = self.prompt("x column (numeric)> ")? else {
                    return Ok(None);
                };
                let Some(y) = self.prompt("y column (numeric)> ")? else {
                    return Ok(None);
                };
                viz::scatter(table, x.trim(), y.trim())
            }
            ChartKind::Pie => {
                let Some(labels) = self.prompt("labels column (categories)> ")? else {
                    return Ok(None);
                };
                let Some(values) = self.prompt("values column (numeric)> ")? else {
                    return Ok(None);
                };
                viz::pie(table, labels.trim(), values.trim())
            }
            ChartKind::Line => {
                let Some(x) = self.prompt("x column> ")? else {
                    return Ok(None);
                };
                let Some(y) = self.prompt("y column (numeric)> ")? else {
                    return Ok(None);
                };
                viz::line(table, x.trim(), y.trim())
            }
        };
        Ok(Some(chart))
    }

    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        self.read_line()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }

    fn print_help(&mut self) -> io::Result<()> {
        writeln!(self.output, "commands:")?;
        writeln!(self.output, "  SQL <query>   execute SQL against the table")?;
        writeln!(self.output, "  VISUALIZE     enter the chart menu")?;
        writeln!(self.output, "  COLUMNS       list columns and their types")?;
        writeln!(self.output, "  DESCRIBE      summary statistics for the current table")?;
        writeln!(self.output, "  HEAD [N]      show the first N rows (default 5)")?;
        writeln!(self.output, "  HELP          show this message")?;
        writeln!(self.output, "  EXIT          quit")?;
        Ok(())
    }
}

fn parse_bins(input: &str) -> Result<usize, VizError> {
    if input.is_empty() {
        return Ok(DEFAULT_HISTOGRAM_BINS);
    }
    match input.parse::<usize>() {
        Ok(bins) if bins > 0 => Ok(bins),
        _ => Err(VizError::BadBins),
    }
}

/// Render a result table: padded columns, a separator, and a row
/// count footer.
pub fn write_table<W: Write>(out: &mut W, table: &Table) -> io::Result<()> {
    if table.row_count() == 0 {
        writeln!(out, "(0 rows)")?;
        return Ok(());
    }

    let widths: Vec<usize> = table
        .schema
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let value_width = table
                .rows
                .iter()
                .map(|row| row.get(i).map(|v| v.to_string().len()).unwrap_or(0))
                .max()
                .unwrap_or(0);
            col.name.len().max(value_width)
        })
        .collect();

    let header: Vec<String> = table
        .schema
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{:width$}", col.name, width = widths[i]))
        .collect();
    writeln!(out, "{}", header.join(" | "))?;

    let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    writeln!(out, "{}", separator.join("-+-"))?;

    for row in &table.rows {
        let cells: Vec<String> = row
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:width$}", v, width = widths[i]))
            .collect();
        writeln!(out, "{}", cells.join(" | "))?;
    }

    writeln!(out, "({} rows)", table.row_count())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::table::{Column, Row, Schema, SqlType, Value};

    #[test]
    fn test_write_table_layout() {
        let schema = Schema::new(vec![
            Column::new("id", SqlType::Integer),
            Column::new("name", SqlType::Text),
        ]);
        let rows = vec![
            Row::new(vec![Value::Integer(1), Value::Text("alpha".into())]),
            Row::new(vec![Value::Null, Value::Text("b".into())]),
        ];
        let table = Table::with_rows("t", schema, rows);

        let mut out = Vec::new();
        write_table(&mut out, &table).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("id   | name"));
        assert!(text.contains("1    | alpha"));
        assert!(text.contains("NULL | b"));
        assert!(text.ends_with("(2 rows)\n"));
    }

    #[test]
    fn test_write_table_empty() {
        let table = Table::new("t", Schema::new(vec![Column::new("a", SqlType::Text)]));
        let mut out = Vec::new();
        write_table(&mut out, &table).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "(0 rows)\n");
    }

    #[test]
    fn test_parse_bins() {
        assert_eq!(parse_bins("").unwrap(), DEFAULT_HISTOGRAM_BINS);
        assert_eq!(parse_bins("25").unwrap(), 25);
        assert!(parse_bins("0").is_err());
        assert!(parse_bins("many").is_err());
    }
}
