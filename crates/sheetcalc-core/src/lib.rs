//! sheetcalc-core - UI-agnostic grid state store + session storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{DEFAULT_COLS, DEFAULT_ROWS, Document, LoadOutcome, MAX_CELLS, Selection};
pub use error::{Result, SheetError};

pub use sheetcalc_engine::engine::{Cell, CellRef, CellValue, Grid};
