//! Completion tracking for multi-sheet loads.
//!
//! A spreadsheet source delivers its sheets one at a time and in no
//! particular order. [`LoadCoordinator`] appends each delivered sheet to a
//! [`SheetStore`] and signals completion exactly once, when the expected
//! number of sheets has arrived.

use crate::error::{Result, SheetError};
use crate::sheet::Grid;
use crate::store::SheetStore;
use std::fmt;

type CompletionCallback = Box<dyn FnOnce(&SheetStore) + Send>;

/// Progress of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Pending { loaded: usize, expected: usize },
    Complete,
}

/// Counts delivered sheets and fires the completion callback once.
pub struct LoadCoordinator {
    store: SheetStore,
    expected: usize,
    loaded: usize,
    on_complete: Option<CompletionCallback>,
}

impl LoadCoordinator {
    /// Expect `expected` sheets loaded into a default store.
    ///
    /// With nothing to load, the callback fires immediately.
    pub fn new<F>(expected: usize, on_complete: F) -> Self
    where
        F: FnOnce(&SheetStore) + Send + 'static,
    {
        Self::with_store(SheetStore::new(), expected, on_complete)
    }

    /// Expect `expected` sheets loaded into `store`
    pub fn with_store<F>(store: SheetStore, expected: usize, on_complete: F) -> Self
    where
        F: FnOnce(&SheetStore) + Send + 'static,
    {
        let mut coordinator = LoadCoordinator {
            store,
            expected,
            loaded: 0,
            on_complete: Some(Box::new(on_complete)),
        };
        coordinator.complete_if_done();
        coordinator
    }

    /// Record a delivered sheet: build it from `grid`, append it to the store
    /// and signal completion if it was the last one expected.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::LoadComplete` once every expected sheet has
    /// arrived; the store is read-only from then on.
    pub fn sheet_loaded(&mut self, name: &str, grid: Grid) -> Result<LoadStatus> {
        if self.is_complete() {
            return Err(SheetError::LoadComplete {
                name: name.to_string(),
            });
        }

        let sheet = self.store.append_grid(name, grid);
        self.loaded += 1;
        tracing::debug!(
            "loaded sheet '{}' ({} rows, {} of {})",
            name,
            sheet.row_count(),
            self.loaded,
            self.expected
        );

        self.complete_if_done();
        Ok(self.status())
    }

    /// Current progress
    #[must_use]
    pub fn status(&self) -> LoadStatus {
        if self.is_complete() {
            LoadStatus::Complete
        } else {
            LoadStatus::Pending {
                loaded: self.loaded,
                expected: self.expected,
            }
        }
    }

    /// Whether every expected sheet has arrived
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.loaded >= self.expected
    }

    /// The store being filled
    #[must_use]
    pub fn store(&self) -> &SheetStore {
        &self.store
    }

    /// Give up the store, loaded or not
    #[must_use]
    pub fn into_store(self) -> SheetStore {
        self.store
    }

    fn complete_if_done(&mut self) {
        if !self.is_complete() {
            return;
        }
        if let Some(callback) = self.on_complete.take() {
            tracing::info!("data successfully loaded ({} sheets)", self.store.len());
            callback(&self.store);
        }
    }
}

impl fmt::Debug for LoadCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadCoordinator")
            .field("store", &self.store)
            .field("expected", &self.expected)
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn grid(header: &str, value: &str) -> Grid {
        vec![vec![header.to_string()], vec![value.to_string()]]
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce(&SheetStore) + Send + 'static) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        (calls, move |_: &SheetStore| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_completes_after_expected_sheets() {
        let (calls, callback) = counter();
        let mut loader = LoadCoordinator::new(2, callback);

        let status = loader.sheet_loaded("A", grid("X", "1")).unwrap();
        assert_eq!(
            status,
            LoadStatus::Pending {
                loaded: 1,
                expected: 2
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let status = loader.sheet_loaded("B", grid("Y", "2")).unwrap();
        assert_eq!(status, LoadStatus::Complete);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(loader.store().names(), vec!["A", "B"]);
    }

    #[test]
    fn test_late_sheet_is_rejected() {
        let (calls, callback) = counter();
        let mut loader = LoadCoordinator::new(1, callback);
        loader.sheet_loaded("A", grid("X", "1")).unwrap();

        let err = loader.sheet_loaded("B", grid("X", "1")).unwrap_err();

        assert!(matches!(err, SheetError::LoadComplete { ref name } if name == "B"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(loader.store().len(), 1);
    }

    #[test]
    fn test_nothing_to_load_completes_immediately() {
        let (calls, callback) = counter();
        let loader = LoadCoordinator::new(0, callback);

        assert!(loader.is_complete());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_sees_loaded_store() {
        let names = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&names);
        let mut loader = LoadCoordinator::new(1, move |store: &SheetStore| {
            let rows = store.view("A").len();
            sink.lock().unwrap().push(rows);
        });

        loader.sheet_loaded("A", grid("X", "1")).unwrap();

        assert_eq!(*names.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_into_store() {
        let mut loader = LoadCoordinator::new(1, |_: &SheetStore| {});
        loader.sheet_loaded("A", grid("X", "1")).unwrap();

        let store = loader.into_store();
        assert_eq!(store.find_by_name("A").row_count(), 1);
    }
}
