//! Grid state store (UI-agnostic).

mod io;
mod ops;
mod state;

pub use io::LoadOutcome;
pub use state::{DEFAULT_COLS, DEFAULT_ROWS, Document, MAX_CELLS, Selection};
