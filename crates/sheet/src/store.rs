use crate::key::{CamelCase, KeyNormalizer};
use crate::sheet::{Grid, Sheet};
use crate::view::SheetView;
use std::fmt;
use std::sync::Arc;

/// The loaded sheets, in load order.
///
/// Sheets are appended during loading and shared immutably afterwards.
/// Names are not required to be unique; lookups return the first match.
#[derive(Clone)]
pub struct SheetStore {
    sheets: Vec<Arc<Sheet>>,
    normalizer: Arc<dyn KeyNormalizer>,
}

impl SheetStore {
    /// Create an empty store using camelCase keys
    #[must_use]
    pub fn new() -> Self {
        Self::with_normalizer(Arc::new(CamelCase))
    }

    /// Create an empty store with a custom key normalizer
    #[must_use]
    pub fn with_normalizer(normalizer: Arc<dyn KeyNormalizer>) -> Self {
        SheetStore {
            sheets: Vec::new(),
            normalizer,
        }
    }

    /// The normalizer used for headers and sort columns
    #[must_use]
    pub fn normalizer(&self) -> &Arc<dyn KeyNormalizer> {
        &self.normalizer
    }

    /// Get the number of sheets
    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Check if no sheet has been loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Sheet names in load order (duplicates included)
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name()).collect()
    }

    /// Add a sheet. No uniqueness check is made.
    pub fn append(&mut self, sheet: Sheet) {
        self.sheets.push(Arc::new(sheet));
    }

    /// Build a sheet from a grid with the store's normalizer and add it
    pub fn append_grid(&mut self, name: &str, grid: Grid) -> Arc<Sheet> {
        let sheet = Arc::new(Sheet::from_grid(name, grid, self.normalizer.as_ref()));
        self.sheets.push(Arc::clone(&sheet));
        sheet
    }

    /// First sheet with the given name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Sheet>> {
        self.sheets.iter().find(|sheet| sheet.name() == name)
    }

    /// First sheet with the given name, or an empty sheet when none matches
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Arc<Sheet> {
        self.get(name)
            .cloned()
            .unwrap_or_else(|| Arc::new(Sheet::empty()))
    }

    /// Shallow copy of the sheet list
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<Sheet>> {
        self.sheets.clone()
    }

    /// Open a query session on a sheet.
    ///
    /// Unknown names give a view over no rows.
    #[must_use]
    pub fn view(&self, name: &str) -> SheetView {
        if self.get(name).is_none() {
            tracing::debug!("no sheet named '{}', using an empty view", name);
        }
        SheetView::new(&self.find_by_name(name), Arc::clone(&self.normalizer))
    }
}

impl Default for SheetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SheetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetStore")
            .field("sheets", &self.names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_append_and_find() {
        let mut store = SheetStore::new();
        store.append_grid("A", grid(&[&["X"], &["1"]]));
        store.append_grid("B", grid(&[&["Y"], &["2"]]));

        assert_eq!(store.len(), 2);
        assert_eq!(store.names(), vec!["A", "B"]);
        assert_eq!(store.find_by_name("B").keys(), &["y".to_string()]);
    }

    #[test]
    fn test_duplicate_names_return_first() {
        let mut store = SheetStore::new();
        store.append_grid("A", grid(&[&["X"], &["first"]]));
        store.append_grid("A", grid(&[&["X"], &["second"]]));

        let sheet = store.find_by_name("A");
        assert_eq!(sheet.data()[0].get(0), Some("first"));
    }

    #[test]
    fn test_missing_name_gives_empty_sheet() {
        let store = SheetStore::new();

        assert!(store.get("Nope").is_none());
        let sheet = store.find_by_name("Nope");
        assert!(sheet.header().is_empty());
        assert!(sheet.data().is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = SheetStore::new();
        store.append_grid("A", grid(&[&["X"]]));

        let mut snapshot = store.snapshot();
        snapshot.clear();

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_view_on_missing_sheet_degrades() {
        let store = SheetStore::new();
        let mut view = store.view("Nope");

        view.filter_column("X", "1").group("X", true).sort("X").reverse();

        assert!(view.is_empty());
        assert!(!view.is_grouped());
    }

    #[test]
    fn test_view_by_empty_name() {
        let mut store = SheetStore::new();
        assert!(store.view("").is_empty());

        store.append_grid("", grid(&[&["X"], &["1"]]));
        assert_eq!(store.view("").len(), 1);
    }

    #[test]
    fn test_custom_normalizer_applies_to_sort() {
        let mut store = SheetStore::with_normalizer(Arc::new(|raw: &str| raw.to_uppercase()));
        store.append_grid("S", grid(&[&["name"], &["b"], &["a"]]));

        let names = store
            .view("S")
            .sort("name")
            .map_rows(|row| row.get_key("NAME").unwrap_or_default().to_string());

        assert_eq!(names, vec!["a", "b"]);
    }
}
