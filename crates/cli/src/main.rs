//! # sheetquery-cli
//!
//! Load CSV files as sheets and query one of them.

mod output;
mod pipeline;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use output::{print_view, OutputFormat};
use pipeline::Pipeline;
use sheetquery_sheet::{
    read_grid_from_path, sheet_name_for_path, CsvOptions, LoadCoordinator, SheetStore,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

/// sq - query spreadsheet data with filter, group, sort and reverse
#[derive(Parser)]
#[command(name = "sq")]
#[command(author, version, about = "Chainable queries over CSV sheets", long_about = None)]
struct Cli {
    /// CSV files to load; each becomes a sheet named after the file stem
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Sheet to query (defaults to the first file)
    #[arg(short = 's', long = "sheet")]
    sheet: Option<String>,

    /// Query pipeline, e.g. "filter Fruit=apple | sort Qty | reverse"
    #[arg(short = 'q', long = "query", default_value = "")]
    query: String,

    /// Field delimiter
    #[arg(short = 'd', long = "delimiter", default_value = ",")]
    delimiter: char,

    /// Trim whitespace around fields
    #[arg(long)]
    trim: bool,

    /// Output format (json, csv, table)
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let pipeline: Pipeline = cli.query.parse().context("Invalid query")?;
    let options = CsvOptions::default()
        .with_delimiter_char(cli.delimiter)?
        .with_trim(cli.trim);

    let store = load_sheets(&cli.files, &options).await?;

    let name = match cli.sheet {
        Some(name) => name,
        None => cli
            .files
            .first()
            .map(|path| sheet_name_for_path(path))
            .unwrap_or_default(),
    };
    if store.get(&name).is_none() {
        tracing::warn!(
            "no sheet named '{}' (loaded: {})",
            name,
            store.names().join(", ")
        );
    }

    let mut view = store.view(&name);
    pipeline.apply(&mut view);
    print_view(&view, cli.format, &options)
}

/// Read every file on the blocking pool and feed the grids to a load
/// coordinator.
///
/// Reads finish in any order, but sheets are handed over in argument order
/// so that lookups by a shared file stem always find the same file.
async fn load_sheets(files: &[PathBuf], options: &CsvOptions) -> Result<SheetStore> {
    let mut loader = LoadCoordinator::new(files.len(), |store: &SheetStore| {
        tracing::info!("sheets ready: {}", store.names().join(", "));
    });

    let mut tasks = JoinSet::new();
    for (index, path) in files.iter().enumerate() {
        let path = path.clone();
        let options = options.clone();
        tasks.spawn_blocking(move || {
            let grid = read_grid_from_path(&path, &options);
            (index, path, grid)
        });
    }

    let mut finished = BTreeMap::new();
    let mut next = 0;
    while let Some(joined) = tasks.join_next().await {
        let (index, path, grid) = joined.context("Sheet loading task failed")?;
        let grid = grid.with_context(|| format!("Failed to read file: {}", path.display()))?;
        finished.insert(index, (path, grid));

        while let Some((path, grid)) = finished.remove(&next) {
            loader.sheet_loaded(&sheet_name_for_path(&path), grid)?;
            next += 1;
        }
    }

    Ok(loader.into_store())
}
