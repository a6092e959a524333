use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "csviz")]
#[command(author, version, about = "Load a CSV into in-memory SQLite, query it with SQL, and chart the results")]
pub struct Cli {
    /// Path to the CSV file to load (prompted for when omitted)
    pub path: Option<PathBuf>,

    /// Execute a single SQL statement and exit (non-interactive mode)
    #[arg(short, long)]
    pub query: Option<String>,

    /// CSV field delimiter
    #[arg(short, long, default_value = ",")]
    pub delimiter: char,

    /// Treat the first row as data instead of a header
    #[arg(long)]
    pub no_header: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
