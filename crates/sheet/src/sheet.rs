use crate::key::KeyNormalizer;
use crate::row::{Keys, Row};
use std::sync::Arc;

/// A raw 2-D grid as delivered by a loader: header row first, data rows after.
pub type Grid = Vec<Vec<String>>;

/// One loaded table: raw header, normalized keys and keyed rows.
///
/// A sheet never changes after it is built; the store shares it behind an
/// `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    header: Vec<String>,
    keys: Arc<Keys>,
    data: Arc<[Row]>,
}

impl Sheet {
    /// Build a sheet from a grid whose first row is the header.
    ///
    /// An empty grid yields a sheet with no columns and no rows.
    ///
    /// # Example
    /// ```
    /// use sheetquery_sheet::{CamelCase, Sheet};
    ///
    /// let sheet = Sheet::from_grid(
    ///     "Stock",
    ///     vec![
    ///         vec!["Fruit".to_string(), "Unit Price".to_string()],
    ///         vec!["apple".to_string(), "0.5".to_string()],
    ///     ],
    ///     &CamelCase,
    /// );
    ///
    /// assert_eq!(sheet.keys(), &["fruit".to_string(), "unitPrice".to_string()]);
    /// assert_eq!(sheet.data()[0].get_key("unitPrice"), Some("0.5"));
    /// ```
    pub fn from_grid<N>(name: &str, grid: Grid, normalizer: &N) -> Self
    where
        N: KeyNormalizer + ?Sized,
    {
        let mut rows = grid.into_iter();
        let header = rows.next().unwrap_or_default();
        Self::from_parts(name, header, rows, normalizer)
    }

    /// Build a sheet from a header and raw data rows
    pub fn from_parts<N, I>(name: &str, header: Vec<String>, rows: I, normalizer: &N) -> Self
    where
        N: KeyNormalizer + ?Sized,
        I: IntoIterator<Item = Vec<String>>,
    {
        let keys = Arc::new(Keys::new(
            header.iter().map(|cell| normalizer.normalize(cell)).collect(),
        ));
        let data: Vec<Row> = rows
            .into_iter()
            .map(|cells| Row::from_cells(&keys, cells))
            .collect();

        Sheet {
            name: name.to_string(),
            header,
            keys,
            data: data.into(),
        }
    }

    /// The sentinel returned for lookups of unknown sheet names
    #[must_use]
    pub fn empty() -> Self {
        Sheet {
            name: String::new(),
            header: Vec::new(),
            keys: Arc::new(Keys::default()),
            data: Arc::from(Vec::new()),
        }
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw column titles
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Normalized keys, same length and order as the header
    #[must_use]
    pub fn keys(&self) -> &[String] {
        self.keys.as_slice()
    }

    /// Data rows (header excluded)
    #[must_use]
    pub fn data(&self) -> &[Row] {
        &self.data
    }

    /// Shared handle on the rows, for views
    pub(crate) fn shared_data(&self) -> Arc<[Row]> {
        Arc::clone(&self.data)
    }

    /// Get the number of data rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.header.len()
    }

    /// Check if the sheet has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Column index of a raw header title
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|title| title == column)
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::empty()
    }
}
