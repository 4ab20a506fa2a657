//! CLI tool for orderdesk - converts workbooks to and from tab JSON
//!
//! Usage:
//!   orderdesk_cli import <input.xlsx>                 # Tabs JSON to stdout
//!   orderdesk_cli import <input.csv> -o tabs.json     # Tabs JSON to file
//!   orderdesk_cli import <input.xlsx> --union         # Every key becomes a column
//!   orderdesk_cli export <tabs.json> -o out.xlsx      # Tabs JSON to XLSX
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr.

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use orderdesk::{export_workbook, import_workbook, ImportOptions, OrderdeskError, Tab};

#[derive(Parser)]
#[command(name = "orderdesk_cli")]
#[command(about = "Convert spreadsheets to and from orderdesk tab JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read an XLSX or CSV file and print its tabs as JSON
    Import {
        /// Workbook or delimited text file
        input: PathBuf,
        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Make every row key a column, not only the first row's
        #[arg(long)]
        union: bool,
    },

    /// Write tabs JSON out as an XLSX workbook
    Export {
        /// JSON file holding an array of tabs
        input: PathBuf,
        /// Destination workbook
        #[arg(short, long, default_value = orderdesk::DOWNLOAD_FILE_NAME)]
        output: PathBuf,
    },
}

fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn read(path: &Path) -> Result<Vec<u8>, OrderdeskError> {
    fs::read(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "cannot read input");
        OrderdeskError::Io(e)
    })
}

fn run(cli: Cli) -> Result<(), OrderdeskError> {
    match cli.command {
        Commands::Import {
            input,
            output,
            union,
        } => {
            let data = read(&input)?;
            let options = ImportOptions::with_union(union);
            let tabs = import_workbook(&data, &options)?;
            let json = serde_json::to_string_pretty(&tabs)?;

            match output {
                Some(path) => {
                    fs::write(&path, &json)?;
                    tracing::info!(path = %path.display(), tabs = tabs.len(), "written");
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(json.as_bytes())?;
                    writeln!(stdout)?;
                }
            }
        }
        Commands::Export { input, output } => {
            let data = read(&input)?;
            let tabs: Vec<Tab> = serde_json::from_slice(&data)?;
            let bytes = export_workbook(&tabs)?;
            fs::write(&output, bytes)?;
            tracing::info!(path = %output.display(), tabs = tabs.len(), "written");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    setup_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
