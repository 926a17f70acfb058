//! One-shot formula evaluation.
//!
//! A formula reads the *stored* values of the cells it references; it never
//! evaluates other formulas. Self-references therefore see whatever the cell
//! currently holds, and there is no cycle detection to speak of.

use super::cell::{CellValue, Grid};
use super::expr::{ExprError, evaluate_expression};
use super::preprocess::preprocess_formula;

/// Evaluate raw cell input against a grid.
///
/// - Input without a leading `=` is returned unchanged as text.
/// - A formula whose residual arithmetic parses yields a number, including
///   `NaN` and infinities from division.
/// - A bare `=` yields empty text.
/// - Anything else yields the `#ERR` marker.
pub fn evaluate_formula(formula: &str, grid: &Grid) -> CellValue {
    if !formula.starts_with('=') {
        return CellValue::Text(formula.to_string());
    }

    let expression = preprocess_formula(formula, grid);
    match evaluate_expression(&expression) {
        Ok(n) => CellValue::Number(n),
        Err(ExprError::Empty) => CellValue::empty(),
        Err(_) => CellValue::error(),
    }
}
