//! Spreadsheet engine API.
//!
//! - [`Cell`], [`CellValue`], [`Grid`] - Data structures for cell storage
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`resolve_range_values`] - Numeric values of a rectangular range
//! - [`summarize_range`] - Sum and cell count of a range, for `SUM`/`AVERAGE`
//! - [`preprocess_formula`] - Rewrite passes turning a formula into arithmetic
//! - [`evaluate_expression`] - Safe arithmetic over `+ - * / ( )`
//! - [`evaluate_formula`] - The whole pipeline, producing a cell value
//! - [`format_number`] - Format numbers for display

mod cell;
mod cell_ref;
mod coerce;
mod eval;
mod expr;
mod format;
mod preprocess;
mod range;

pub use cell::{Cell, CellValue, ERROR_MARKER, Grid, cell_at, create_grid};
pub use cell_ref::CellRef;
pub use coerce::{leading_number, strict_number};
pub use eval::evaluate_formula;
pub use expr::{ExprError, evaluate_expression};
pub use format::format_number;
pub use preprocess::{preprocess_formula, substitute_cell_refs, substitute_range_functions};
pub use range::{CellRange, RangeSummary, RangeValues, resolve_range_values, summarize_range};
