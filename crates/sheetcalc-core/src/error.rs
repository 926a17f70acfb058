//! Error types for sheetcalc core.

use thiserror::Error;

/// Errors that can cross the store's API boundary.
///
/// Formula failures are not errors: they are stored as the `#ERR` cell value.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session format error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid grid dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("No session path set")]
    NoSessionPath,
}

pub type Result<T> = std::result::Result<T, SheetError>;
