//! Built-in range functions and their metadata.
//!
//! Conventions:
//! - Spreadsheet-facing names are ALL CAPS (`SUM`, `AVERAGE`).
//! - A call takes exactly one `START:END` argument and is rewritten to a
//!   numeric literal before arithmetic evaluation.
//! - Passes run in `RANGE_BUILTINS` order. If you add a new range function,
//!   append it here; nothing else needs registering.

use crate::engine::RangeSummary;
use regex::Regex;
use std::sync::OnceLock;

pub struct RangeBuiltin {
    pub sheet_name: &'static str,
    pub description: &'static str,
    /// Reduce the range to the literal that replaces the call.
    pub aggregate: fn(&RangeSummary) -> f64,
}

pub const RANGE_BUILTINS: &[RangeBuiltin] = &[
    RangeBuiltin {
        sheet_name: "SUM",
        description: "Sum of numeric values in a cell range",
        aggregate: sum,
    },
    RangeBuiltin {
        sheet_name: "AVERAGE",
        description: "Arithmetic mean of a cell range (0 for an empty range)",
        aggregate: average,
    },
];

pub fn sum(range: &RangeSummary) -> f64 {
    range.sum
}

/// Cells outside the grid are zeros, so they count toward the divisor.
pub fn average(range: &RangeSummary) -> f64 {
    if range.count == 0.0 {
        0.0
    } else {
        range.sum / range.count
    }
}

/// Each builtin paired with its call pattern `NAME(` + range text + `)`,
/// in pass order. Capture group 1 is the raw range argument.
pub(crate) fn range_fn_patterns() -> impl Iterator<Item = (&'static RangeBuiltin, &'static Regex)> {
    static RANGE_FN_RES: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = RANGE_FN_RES.get_or_init(|| {
        RANGE_BUILTINS
            .iter()
            .map(|b| {
                Regex::new(&format!(r"{}\(([A-Z0-9:]+)\)", regex::escape(b.sheet_name)))
                    .expect("range function regex must compile")
            })
            .collect()
    });
    RANGE_BUILTINS.iter().zip(patterns.iter())
}
