//! Cell data structures for the spreadsheet grid.
//!
//! - [`CellValue`] - What a cell displays: literal text or a computed number
//! - [`Cell`] - A cell's label, displayed value, and raw input
//! - [`Grid`] - Dense row-major storage, cloned wholesale for history snapshots

use serde::{Deserialize, Serialize};

use super::cell_ref::CellRef;
use super::coerce::{leading_number, strict_number};
use super::format::format_number;

/// Value stored in a cell when a formula cannot be evaluated.
pub const ERROR_MARKER: &str = "#ERR";

/// The displayed value of a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Literal input, or the error marker.
    Text(String),
    /// Result of a formula. May be `NaN` or infinite.
    Number(#[serde(with = "float_repr")] f64),
}

impl CellValue {
    pub fn empty() -> CellValue {
        CellValue::Text(String::new())
    }

    pub fn error() -> CellValue {
        CellValue::Text(ERROR_MARKER.to_string())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Text(s) if s == ERROR_MARKER)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }

    /// Numeric value as seen by range functions; non-numeric text is `0`.
    pub fn range_number(&self) -> f64 {
        let n = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => strict_number(s).unwrap_or(0.0),
        };
        if n.is_nan() { 0.0 } else { n }
    }

    /// Numeric value as seen by a bare reference; uses the leading numeric prefix.
    pub fn reference_number(&self) -> f64 {
        let n = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => leading_number(s).unwrap_or(0.0),
        };
        if n.is_nan() { 0.0 } else { n }
    }

    /// Display string for the cell.
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::empty()
    }
}

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Label assigned when the grid was created (e.g. `B3`).
    pub id: String,
    /// Displayed value, derived from `formula`.
    pub value: CellValue,
    /// Raw user input, including the leading `=` for formulas.
    pub formula: String,
}

impl Cell {
    pub fn new_empty(row: usize, col: usize) -> Cell {
        Cell {
            id: CellRef::new(row, col).to_string(),
            value: CellValue::empty(),
            formula: String::new(),
        }
    }

    pub fn is_formula(&self) -> bool {
        self.formula.starts_with('=')
    }
}

/// Row-major grid of cells: `grid[row][col]`.
pub type Grid = Vec<Vec<Cell>>;

/// Build a fresh grid with empty cells labelled by position.
pub fn create_grid(rows: usize, cols: usize) -> Grid {
    (0..rows)
        .map(|r| (0..cols).map(|c| Cell::new_empty(r, c)).collect())
        .collect()
}

/// Look up a cell, treating out-of-range coordinates as missing.
pub fn cell_at<'a>(grid: &'a Grid, cell_ref: &CellRef) -> Option<&'a Cell> {
    grid.get(cell_ref.row).and_then(|row| row.get(cell_ref.col))
}

/// JSON has no representation for non-finite floats, so those are written as
/// strings (`"NaN"`, `"Infinity"`, `"-Infinity"`).
mod float_repr {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::format_number;

    pub fn serialize<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if n.is_finite() {
            serializer.serialize_f64(*n)
        } else {
            serializer.serialize_str(&format_number(*n))
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(f64),
        Str(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(n),
            Repr::Str(s) => match s.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(serde::de::Error::custom(format!(
                    "invalid number value: {}",
                    other
                ))),
            },
        }
    }
}
