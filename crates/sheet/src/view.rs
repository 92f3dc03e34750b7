//! Chainable, non-destructive queries over one sheet.

use crate::filter::Filter;
use crate::key::{CamelCase, KeyNormalizer};
use crate::row::Row;
use crate::sheet::Sheet;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A bucket of rows sharing one value in the grouped column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub name: String,
    pub data: Vec<Row>,
}

/// The working result set of a view: flat rows, or groups after
/// [`SheetView::group`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewData {
    Rows(Vec<Row>),
    Groups(Vec<Group>),
}

impl ViewData {
    /// Number of top-level entries (rows or groups)
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ViewData::Rows(rows) => rows.len(),
            ViewData::Groups(groups) => groups.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_grouped(&self) -> bool {
        matches!(self, ViewData::Groups(_))
    }

    /// The rows, if not grouped
    #[must_use]
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            ViewData::Rows(rows) => Some(rows),
            ViewData::Groups(_) => None,
        }
    }

    /// The groups, if grouped
    #[must_use]
    pub fn groups(&self) -> Option<&[Group]> {
        match self {
            ViewData::Rows(_) => None,
            ViewData::Groups(groups) => Some(groups),
        }
    }
}

/// One entry of the current data, as handed to [`SheetView::map`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewItem<'a> {
    Row(&'a Row),
    Group(&'a Group),
}

impl<'a> ViewItem<'a> {
    #[must_use]
    pub fn as_row(&self) -> Option<&'a Row> {
        match *self {
            ViewItem::Row(row) => Some(row),
            ViewItem::Group(_) => None,
        }
    }

    #[must_use]
    pub fn as_group(&self) -> Option<&'a Group> {
        match *self {
            ViewItem::Row(_) => None,
            ViewItem::Group(group) => Some(group),
        }
    }
}

/// A query session over one sheet.
///
/// The view keeps the sheet's rows as its original data and a separate
/// current data set. Every transformation replaces the current data and
/// returns the same view, so calls chain:
///
/// ```
/// use sheetquery_sheet::{SheetStore, Sheet, CamelCase};
///
/// let mut store = SheetStore::new();
/// store.append(Sheet::from_grid(
///     "Sheet1",
///     vec![
///         vec!["Fruit".into(), "Qty".into()],
///         vec!["apple".into(), "3".into()],
///         vec!["banana".into(), "1".into()],
///         vec!["apple".into(), "5".into()],
///     ],
///     &CamelCase,
/// ));
///
/// let qty = store
///     .view("Sheet1")
///     .filter_column("Fruit", "apple")
///     .sort("Qty")
///     .map_rows(|row| row.get_key("qty").unwrap_or_default().to_string());
///
/// assert_eq!(qty, vec!["3", "5"]);
/// ```
///
/// Transformations never touch the sheet, so any number of views over the
/// same sheet stay independent.
#[derive(Clone)]
pub struct SheetView {
    header: Vec<String>,
    keys: Vec<String>,
    original: Arc<[Row]>,
    current: ViewData,
    normalizer: Arc<dyn KeyNormalizer>,
}

impl SheetView {
    /// Create a view whose `sort` resolves columns with `normalizer`
    pub fn new(sheet: &Sheet, normalizer: Arc<dyn KeyNormalizer>) -> Self {
        let original = sheet.shared_data();
        SheetView {
            header: sheet.header().to_vec(),
            keys: sheet.keys().to_vec(),
            current: ViewData::Rows(original.to_vec()),
            original,
            normalizer,
        }
    }

    /// Create a view using the default camelCase normalizer
    #[must_use]
    pub fn from_sheet(sheet: &Sheet) -> Self {
        Self::new(sheet, Arc::new(CamelCase))
    }

    /// Raw column titles
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Normalized column keys
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Copy of the sheet's rows, untouched by any transformation
    #[must_use]
    pub fn original_data(&self) -> Vec<Row> {
        self.original.to_vec()
    }

    /// Copy of the current result set
    #[must_use]
    pub fn current_data(&self) -> ViewData {
        self.current.clone()
    }

    /// Whether the current data holds groups rather than rows
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        self.current.is_grouped()
    }

    /// Number of rows (or groups) in the current data
    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    // ===== Transformations =====

    /// Keep the original rows matching `filter`.
    ///
    /// Filtering always starts from the original data: earlier filters,
    /// groups and sorts are discarded, so `filter(a).filter(b)` is the same
    /// as `filter(b)`. A `Filter::Column` naming an unknown column matches
    /// nothing.
    pub fn filter(&mut self, filter: impl Into<Filter>) -> &mut Self {
        let filter = filter.into();
        let predicate = filter.compile(&self.header);
        let rows: Vec<Row> = self
            .original
            .iter()
            .filter(|&row| predicate(row))
            .cloned()
            .collect();

        tracing::debug!(
            "filter kept {} of {} rows",
            rows.len(),
            self.original.len()
        );
        self.current = ViewData::Rows(rows);
        self
    }

    /// Keep the original rows whose cell under the raw header `column`
    /// equals `value`
    pub fn filter_column(&mut self, column: &str, value: &str) -> &mut Self {
        self.filter(Filter::column(column, value))
    }

    /// Bucket the current rows by their value under the raw header `column`.
    ///
    /// Groups keep first-seen order, or ascend case-insensitively by name
    /// when `sort` is set. Unknown columns leave the view unchanged, and so
    /// does grouping a view that is already grouped.
    pub fn group(&mut self, column: &str, sort: bool) -> &mut Self {
        let Some(index) = self.header.iter().position(|title| title == column) else {
            tracing::debug!("group ignored: no column named '{}'", column);
            return self;
        };

        let ViewData::Rows(rows) = &mut self.current else {
            tracing::warn!("group by '{}' ignored: data is already grouped", column);
            return self;
        };
        let rows = std::mem::take(rows);

        let mut buckets: IndexMap<String, Vec<Row>> = IndexMap::new();
        for row in rows {
            let name = row.get(index).unwrap_or_default().to_string();
            buckets.entry(name).or_default().push(row);
        }

        let mut groups: Vec<Group> = buckets
            .into_iter()
            .map(|(name, data)| Group { name, data })
            .collect();
        if sort {
            groups.sort_by_cached_key(|group| sort_key(Some(group.name.as_str())));
        }

        tracing::debug!("grouped by '{}' into {} groups", column, groups.len());
        self.current = ViewData::Groups(groups);
        self
    }

    /// Sort rows ascending by `column`, case-insensitively.
    ///
    /// The column name is normalized into a key before lookup, falling back
    /// to a column position for numeric names. Values compare
    /// as upper-cased strings (so `"10"` sorts before `"9"`) and empty or
    /// missing values sort first. When grouped, rows are sorted inside each
    /// group and the group order is kept.
    pub fn sort(&mut self, column: &str) -> &mut Self {
        let key = self.normalizer.normalize(column);
        let by_key = |row: &Row| sort_key(row.field(&key));

        match &mut self.current {
            ViewData::Rows(rows) => rows.sort_by_cached_key(by_key),
            ViewData::Groups(groups) => {
                for group in groups.iter_mut() {
                    group.data.sort_by_cached_key(by_key);
                }
            }
        }

        tracing::debug!("sorted by key '{}'", key);
        self
    }

    /// Reverse the current rows, or the group order when grouped
    pub fn reverse(&mut self) -> &mut Self {
        match &mut self.current {
            ViewData::Rows(rows) => rows.reverse(),
            ViewData::Groups(groups) => groups.reverse(),
        }
        self
    }

    /// Drop every transformation and start over from the original data
    pub fn reset(&mut self) -> &mut Self {
        self.current = ViewData::Rows(self.original.to_vec());
        self
    }

    // ===== Projection =====

    /// Project each entry of the current data
    pub fn map<R, F>(&self, mut f: F) -> Vec<R>
    where
        F: FnMut(ViewItem<'_>) -> R,
    {
        match &self.current {
            ViewData::Rows(rows) => rows.iter().map(|row| f(ViewItem::Row(row))).collect(),
            ViewData::Groups(groups) => groups
                .iter()
                .map(|group| f(ViewItem::Group(group)))
                .collect(),
        }
    }

    /// Project each current row, walking groups in order when grouped
    pub fn map_rows<R, F>(&self, f: F) -> Vec<R>
    where
        F: FnMut(&Row) -> R,
    {
        match &self.current {
            ViewData::Rows(rows) => rows.iter().map(f).collect(),
            ViewData::Groups(groups) => groups
                .iter()
                .flat_map(|group| group.data.iter())
                .map(f)
                .collect(),
        }
    }
}

impl fmt::Debug for SheetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetView")
            .field("header", &self.header)
            .field("keys", &self.keys)
            .field("original_rows", &self.original.len())
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

fn sort_key(value: Option<&str>) -> String {
    value.map(str::to_uppercase).unwrap_or_default()
}
