use anyhow::Result;
use colored::Colorize;
use comfy_table::Table;
use sheetquery_sheet::{CsvOptions, Row, SheetView, ViewData};
use std::io::{self, Write};

/// Output format for results.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Pretty table output (default)
    #[default]
    Table,
}

/// Print the current data of a view in the given format.
///
/// CSV output uses the same options the sheets were read with.
pub fn print_view(view: &SheetView, format: OutputFormat, csv: &CsvOptions) -> Result<()> {
    let stdout = io::stdout();
    write_view(&mut stdout.lock(), view, format, csv)
}

fn write_view<W: Write>(
    out: &mut W,
    view: &SheetView,
    format: OutputFormat,
    csv: &CsvOptions,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &view.current_data())?;
            writeln!(out)?;
        }
        OutputFormat::Csv => view.write_csv(&mut *out, csv)?,
        OutputFormat::Table => {
            if view.is_empty() {
                writeln!(out, "(no rows)")?;
                return Ok(());
            }
            match view.current_data() {
                ViewData::Rows(rows) => write_table(out, view.header(), &rows)?,
                ViewData::Groups(groups) => {
                    for group in &groups {
                        let title = format!("{} ({} rows)", group.name, group.data.len());
                        writeln!(out, "{}", title.cyan().bold())?;
                        write_table(out, view.header(), &group.data)?;
                        writeln!(out)?;
                    }
                }
            }
        }
    }

    Ok(())
}

fn write_table<W: Write>(out: &mut W, header: &[String], rows: &[Row]) -> io::Result<()> {
    let mut table = Table::new();
    table.load_preset("||--+-++|    ++++++");
    table.set_header(header);
    for row in rows {
        table.add_row(row.cells());
    }
    writeln!(out, "{table}")
}
