use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use csviz::cli::Cli;
use csviz::repl::{write_table, Repl};
use csviz::sqlite::query::QueryOutcome;
use csviz::sqlite::session::Session;
use csviz::storage::csv::CsvReader;

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("csviz=warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse_args();

    let path = match cli.path {
        Some(path) => path,
        None => prompt_for_path()?,
    };

    let reader = CsvReader::new()
        .with_delimiter(cli.delimiter)
        .with_header(!cli.no_header);
    let session = Session::open(&path, &reader)
        .with_context(|| format!("could not load '{}'", path.display()))?;

    print_schema_banner(&session);

    if let Some(query) = &cli.query {
        return run_query(&session, query);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    Repl::new(session, stdin.lock(), stdout.lock()).run()?;
    Ok(())
}

fn prompt_for_path() -> Result<PathBuf> {
    print!("Enter the path to your CSV file: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let line = line.trim();
    if line.is_empty() {
        bail!("no file path given");
    }
    Ok(PathBuf::from(line))
}

fn print_schema_banner(session: &Session) {
    let snapshot = session.snapshot();
    println!(
        "loaded {} rows into table '{}':",
        snapshot.row_count(),
        session.table_name()
    );
    for column in &snapshot.schema.columns {
        println!("  {} {}", column.name, column.sql_type);
    }
}

fn run_query(session: &Session, query: &str) -> Result<()> {
    match session.execute_sql(query)? {
        QueryOutcome::Rows(table) => {
            let mut out = io::stdout().lock();
            write_table(&mut out, &table)?;
        }
        QueryOutcome::Affected(n) => println!("{} rows affected", n),
    }
    Ok(())
}
