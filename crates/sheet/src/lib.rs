//! In-memory sheet store with chainable row queries.
//!
//! A loader hands over each sheet as a grid (header row first). The grid is
//! turned into keyed [`Row`]s whose fields are reachable both by column index
//! and by a key normalized from the header, then kept in a [`SheetStore`].
//! A [`SheetView`] opened on a sheet filters, groups, sorts and reverses a
//! private copy of its rows; the loaded data never changes.
//!
//! # Examples
//!
//! ## Querying a sheet
//!
//! ```
//! use sheetquery_sheet::{Filter, SheetStore};
//!
//! let mut store = SheetStore::new();
//! store.append_grid(
//!     "People",
//!     vec![
//!         vec!["Name".into(), "Team".into(), "Age".into()],
//!         vec!["Al".into(), "red".into(), "10".into()],
//!         vec!["Bo".into(), "blue".into(), "20".into()],
//!         vec!["Cy".into(), "red".into(), "30".into()],
//!     ],
//! );
//!
//! let names = store
//!     .view("People")
//!     .filter(Filter::matching([("team", "red")]))
//!     .sort("Name")
//!     .reverse()
//!     .map_rows(|row| row.get_key("name").unwrap_or_default().to_string());
//!
//! assert_eq!(names, vec!["Cy", "Al"]);
//! ```
//!
//! ## Grouping
//!
//! ```
//! use sheetquery_sheet::SheetStore;
//!
//! let mut store = SheetStore::new();
//! store.append_grid(
//!     "People",
//!     vec![
//!         vec!["Name".into(), "Team".into()],
//!         vec!["Al".into(), "red".into()],
//!         vec!["Bo".into(), "blue".into()],
//!         vec!["Cy".into(), "red".into()],
//!     ],
//! );
//!
//! let sizes = store
//!     .view("People")
//!     .group("Team", true)
//!     .map(|item| item.as_group().map_or(0, |group| group.data.len()));
//!
//! assert_eq!(sizes, vec![1, 2]); // blue, red
//! ```
//!
//! ## Loading several sheets
//!
//! ```
//! use sheetquery_sheet::{read_grid_from_str, CsvOptions, LoadCoordinator, LoadStatus};
//!
//! let mut loader = LoadCoordinator::new(1, |store| {
//!     assert_eq!(store.names(), vec!["Fruit"]);
//! });
//! let grid = read_grid_from_str("Fruit,Qty\napple,3", &CsvOptions::default()).unwrap();
//!
//! assert_eq!(loader.sheet_loaded("Fruit", grid).unwrap(), LoadStatus::Complete);
//! ```

mod csv;
mod error;
mod filter;
mod key;
mod loader;
mod row;
mod sheet;
mod store;
mod view;

/// Re-export CSV grid helpers and options.
pub use csv::{read_grid, read_grid_from_path, read_grid_from_str, sheet_name_for_path, CsvOptions};
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export filter criteria.
pub use filter::Filter;
/// Re-export key normalization.
pub use key::{CamelCase, KeyNormalizer};
/// Re-export load tracking.
pub use loader::{LoadCoordinator, LoadStatus};
/// Re-export row types.
pub use row::{Keys, Row};
/// Re-export sheet types.
pub use sheet::{Grid, Sheet};
/// Re-export the sheet store.
pub use store::SheetStore;
/// Re-export view types.
pub use view::{Group, SheetView, ViewData, ViewItem};
