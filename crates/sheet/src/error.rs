use thiserror::Error;

/// Errors that can occur while loading sheets.
///
/// Query operations on a [`crate::SheetView`] never fail; missing sheets and
/// unknown columns degrade to empty results instead.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Sheet loaded after loading completed: {name}")]
    LoadComplete { name: String },

    #[error("Invalid delimiter: {0:?} (must be a single ASCII character)")]
    InvalidDelimiter(char),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
