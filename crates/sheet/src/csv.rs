//! CSV as a local grid source and an output format for views.

use crate::error::{Result, SheetError};
use crate::sheet::Grid;
use crate::view::SheetView;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// CSV reader/writer options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Whether to trim whitespace around fields when reading
    pub trim: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            quote: b'"',
            trim: false,
        }
    }
}

impl CsvOptions {
    /// Create options for TSV (tab-separated values)
    #[must_use]
    pub fn tsv() -> Self {
        CsvOptions {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the delimiter from a character
    ///
    /// # Errors
    ///
    /// Returns `SheetError::InvalidDelimiter` for non-ASCII characters.
    pub fn with_delimiter_char(self, delimiter: char) -> Result<Self> {
        let byte = u8::try_from(delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(SheetError::InvalidDelimiter(delimiter))?;
        Ok(self.with_delimiter(byte))
    }

    /// Set whether to trim fields
    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

/// Read a grid from a reader. Records may have differing lengths.
pub fn read_grid<R: Read>(reader: R, options: &CsvOptions) -> Result<Grid> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .has_headers(false) // the header is the grid's first row
        .flexible(true)
        .trim(if options.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .from_reader(reader);

    let mut grid = Grid::new();
    for result in csv_reader.records() {
        let record = result?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

/// Read a grid from a CSV file
pub fn read_grid_from_path<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Grid> {
    let file = File::open(path.as_ref())?;
    read_grid(BufReader::new(file), options)
}

/// Read a grid from a CSV string
pub fn read_grid_from_str(content: &str, options: &CsvOptions) -> Result<Grid> {
    read_grid(content.as_bytes(), options)
}

/// Sheet name for a file: its stem, as in `Fruit.csv` -> `Fruit`
#[must_use]
pub fn sheet_name_for_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet")
        .to_string()
}

impl SheetView {
    /// Write the header and current rows as CSV.
    ///
    /// Grouped views are written row by row in group order.
    pub fn write_csv<W: Write>(&self, writer: W, options: &CsvOptions) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .from_writer(writer);

        csv_writer.write_record(self.header())?;
        for record in self.map_rows(|row| row.cells().to_vec()) {
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Convert the current rows to a CSV string
    #[must_use]
    pub fn to_csv_string(&self) -> String {
        let mut buffer = Vec::new();
        // Writing to memory only fails on invalid options
        let _ = self.write_csv(&mut buffer, &CsvOptions::default());
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SheetStore;
    use tempfile::tempdir;

    #[test]
    fn test_read_grid_from_str() {
        let grid = read_grid_from_str("name,age\nAlice,30\nBob,25", &CsvOptions::default()).unwrap();

        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec!["name", "age"]);
        assert_eq!(grid[2], vec!["Bob", "25"]);
    }

    #[test]
    fn test_ragged_rows() {
        let grid = read_grid_from_str("a,b,c\n1\n1,2", &CsvOptions::default()).unwrap();

        assert_eq!(grid[1].len(), 1);
        assert_eq!(grid[2].len(), 2);
    }

    #[test]
    fn test_values_stay_strings() {
        let grid = read_grid_from_str("n\n007\n", &CsvOptions::default()).unwrap();

        assert_eq!(grid[1][0], "007");
    }

    #[test]
    fn test_tsv_and_trim() {
        let options = CsvOptions::tsv().with_trim(true);
        let grid = read_grid_from_str("name\t age \n Alice \t30", &options).unwrap();

        assert_eq!(grid[0], vec!["name", "age"]);
        assert_eq!(grid[1], vec!["Alice", "30"]);
    }

    #[test]
    fn test_delimiter_char() {
        let options = CsvOptions::default().with_delimiter_char(';').unwrap();
        assert_eq!(options.delimiter, b';');

        let err = CsvOptions::default().with_delimiter_char('é').unwrap_err();
        assert!(matches!(err, SheetError::InvalidDelimiter('é')));
    }

    #[test]
    fn test_read_grid_from_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("Fruit.csv");
        std::fs::write(&file_path, "Fruit,Qty\napple,3\n").unwrap();

        let grid = read_grid_from_path(&file_path, &CsvOptions::default()).unwrap();

        assert_eq!(grid.len(), 2);
        assert_eq!(sheet_name_for_path(&file_path), "Fruit");
    }

    #[test]
    fn test_missing_file() {
        let result = read_grid_from_path("/no/such/file.csv", &CsvOptions::default());
        assert!(matches!(result, Err(SheetError::Io(_))));
    }

    #[test]
    fn test_view_to_csv_string() {
        let mut store = SheetStore::new();
        let grid = read_grid_from_str("K,N\nb,1\na,2\nb,3", &CsvOptions::default()).unwrap();
        store.append_grid("S", grid);

        let csv = store.view("S").group("K", true).to_csv_string();

        assert_eq!(csv, "K,N\na,2\nb,1\nb,3\n");
    }
}
