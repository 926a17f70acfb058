//! Formula preprocessing: textual rewrite passes.
//!
//! Before a formula can be evaluated as arithmetic, every function call and
//! cell reference is replaced by a numeric literal read from the grid:
//!
//! 1. **Range functions**: `SUM(A1:A3)` → `6`, then `AVERAGE(B1:B2)` → `5`
//! 2. **Cell references**: `A1` → the cell's numeric value
//!
//! Range functions must go first, otherwise `A1:A3` inside the call would be
//! consumed by the cell-reference pass. Each pass is a pure function of its
//! input text and the grid.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::cell::{Grid, cell_at};
use super::cell_ref::CellRef;
use super::format::format_number;
use super::range::summarize_range;
use crate::builtins::{RangeBuiltin, range_fn_patterns};

fn cell_ref_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| {
        Regex::new(r"[A-Z]+[0-9]+").expect("cell reference regex must compile")
    })
}

/// Strip the leading `=`, upper-case, and run every rewrite pass.
/// Returns the residual arithmetic text.
pub fn preprocess_formula(formula: &str, grid: &Grid) -> String {
    let body = formula.strip_prefix('=').unwrap_or(formula);
    let expression = body.to_uppercase();
    let with_ranges = substitute_range_functions(&expression, grid);
    substitute_cell_refs(&with_ranges, grid)
}

/// Replace each `NAME(START:END)` call with its aggregate, builtin by builtin.
pub fn substitute_range_functions(expression: &str, grid: &Grid) -> String {
    range_fn_patterns().fold(expression.to_string(), |text, (builtin, re)| {
        substitute_range_function(&text, builtin, re, grid)
    })
}

fn substitute_range_function(
    expression: &str,
    builtin: &RangeBuiltin,
    re: &Regex,
    grid: &Grid,
) -> String {
    re.replace_all(expression, |caps: &Captures| {
        // Extra `:` segments are ignored; a missing side makes the whole call 0.
        let mut parts = caps[1].split(':');
        let start = parts.next().unwrap_or("");
        let end = parts.next().unwrap_or("");
        if start.is_empty() || end.is_empty() {
            return "0".to_string();
        }

        let range = summarize_range(start, end, grid);
        format_number((builtin.aggregate)(&range))
    })
    .into_owned()
}

/// Replace every remaining `LETTERS DIGITS` run with that cell's numeric value.
/// Missing, unparseable, or non-numeric cells become `0`.
pub fn substitute_cell_refs(expression: &str, grid: &Grid) -> String {
    cell_ref_re()
        .replace_all(expression, |caps: &Captures| {
            let value = CellRef::from_str(&caps[0])
                .and_then(|cell_ref| cell_at(grid, &cell_ref))
                .map(|cell| cell.value.reference_number())
                .unwrap_or(0.0);
            format_number(value)
        })
        .into_owned()
}
