//! Rectangular range resolution.
//!
//! Given two corner labels, covers every coordinate between them (inclusive,
//! corner order irrelevant) in row-major order and reads numeric values from a
//! grid. Unparseable corners resolve to nothing. Cells outside the grid count
//! as `0`, including row `0` (`A0`), which sits just above the first row.

use super::cell::{Grid, cell_at};
use super::cell_ref::CellRef;

/// Inclusive rectangle between two corner labels.
///
/// Rows are signed so a row-0 corner keeps its place in the rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub top: i128,
    pub bottom: i128,
    pub left: usize,
    pub right: usize,
}

/// What a range function needs from a range: the sum of its values and how
/// many cells it spans.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeSummary {
    pub sum: f64,
    pub count: f64,
}

impl RangeSummary {
    pub const EMPTY: RangeSummary = RangeSummary { sum: 0.0, count: 0.0 };
}

impl CellRange {
    /// Parse two corner labels. `None` if either fails to match.
    pub fn parse(start: &str, end: &str) -> Option<CellRange> {
        let (start_row, start_col) = CellRef::split_label(start)?;
        let (end_row, end_col) = CellRef::split_label(end)?;
        let (start_row, end_row) = (start_row as i128 - 1, end_row as i128 - 1);
        Some(CellRange {
            top: start_row.min(end_row),
            bottom: start_row.max(end_row),
            left: start_col.min(end_col),
            right: start_col.max(end_col),
        })
    }

    /// Number of cells in the rectangle, grid bounds aside.
    pub fn cell_count(&self) -> f64 {
        let rows = (self.bottom - self.top) as f64 + 1.0;
        let cols = (self.right - self.left) as f64 + 1.0;
        rows * cols
    }

    /// Sum and size of the range.
    ///
    /// Only the part overlapping the grid is visited; everything else is `0`
    /// and adds nothing to the sum.
    pub fn summarize(&self, grid: &Grid) -> RangeSummary {
        let first_row = usize::try_from(self.top.max(0)).unwrap_or(usize::MAX);
        let rows_in_grid = grid.len().min(usize::try_from(self.bottom + 1).unwrap_or(0));

        let mut sum = 0.0;
        for row in grid.iter().take(rows_in_grid).skip(first_row) {
            if self.left >= row.len() {
                continue;
            }
            let last_col = self.right.min(row.len() - 1);
            sum = row[self.left..=last_col]
                .iter()
                .fold(sum, |acc, cell| acc + cell.value.range_number());
        }

        RangeSummary {
            sum,
            count: self.cell_count(),
        }
    }

    /// Every value of the range in row-major order.
    pub fn values<'a>(&self, grid: &'a Grid) -> RangeValues<'a> {
        RangeValues {
            grid,
            range: Some(*self),
            row: self.top,
            col: self.left,
        }
    }
}

/// Lazy row-major walk over a range, yielding `0` for cells outside the grid.
pub struct RangeValues<'a> {
    grid: &'a Grid,
    range: Option<CellRange>,
    row: i128,
    col: usize,
}

impl Iterator for RangeValues<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let range = self.range?;
        if self.row > range.bottom {
            return None;
        }

        let value = usize::try_from(self.row)
            .ok()
            .and_then(|row| cell_at(self.grid, &CellRef::new(row, self.col)))
            .map(|cell| cell.value.range_number())
            .unwrap_or(0.0);

        if self.col == range.right {
            self.col = range.left;
            self.row += 1;
        } else {
            self.col += 1;
        }
        Some(value)
    }
}

/// Numeric values of every cell in `start:end`, row-major.
///
/// Cells outside the grid count as `0`, as do cells whose value is not
/// numeric. Yields nothing if either label fails to parse.
pub fn resolve_range_values<'a>(start: &str, end: &str, grid: &'a Grid) -> RangeValues<'a> {
    match CellRange::parse(start, end) {
        Some(range) => range.values(grid),
        None => RangeValues {
            grid,
            range: None,
            row: 0,
            col: 0,
        },
    }
}

/// Sum and cell count of `start:end`; [`RangeSummary::EMPTY`] if either label
/// fails to parse.
pub fn summarize_range(start: &str, end: &str, grid: &Grid) -> RangeSummary {
    CellRange::parse(start, end)
        .map(|range| range.summarize(grid))
        .unwrap_or(RangeSummary::EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CellValue, create_grid};

    fn grid_with(values: &[(usize, usize, &str)]) -> Grid {
        let mut grid = create_grid(5, 5);
        for (row, col, value) in values {
            grid[*row][*col].value = CellValue::Text(value.to_string());
        }
        grid
    }

    fn values(start: &str, end: &str, grid: &Grid) -> Vec<f64> {
        resolve_range_values(start, end, grid).collect()
    }

    #[test]
    fn test_resolve_single_column() {
        let grid = grid_with(&[(0, 0, "1"), (1, 0, "2"), (2, 0, "3")]);
        assert_eq!(values("A1", "A3", &grid), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_resolve_is_order_independent() {
        let grid = grid_with(&[(0, 0, "1"), (4, 0, "5")]);
        assert_eq!(values("A5", "A1", &grid), values("A1", "A5", &grid));
    }

    #[test]
    fn test_resolve_row_major_rectangle() {
        let grid = grid_with(&[(0, 0, "1"), (0, 1, "2"), (1, 0, "3"), (1, 1, "4")]);
        assert_eq!(values("B2", "A1", &grid), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_out_of_bounds_and_text_count_as_zero() {
        let grid = grid_with(&[(4, 4, "hello")]);
        assert_eq!(values("E5", "F6", &grid), vec![0.0; 4]);
    }

    #[test]
    fn test_unparseable_corner_resolves_empty() {
        let grid = grid_with(&[]);
        assert!(values("A1", "1", &grid).is_empty());
        assert!(values("", "A2", &grid).is_empty());
        assert!(values("a1", "A2", &grid).is_empty());
        assert_eq!(summarize_range("A1", "1", &grid), RangeSummary::EMPTY);
    }

    #[test]
    fn test_row_zero_corner_is_an_empty_row_above_the_grid() {
        let grid = grid_with(&[(0, 0, "1"), (1, 0, "2")]);
        assert_eq!(values("A0", "A2", &grid), vec![0.0, 1.0, 2.0]);
        assert_eq!(
            summarize_range("A0", "A2", &grid),
            RangeSummary { sum: 3.0, count: 3.0 }
        );
        assert_eq!(
            summarize_range("A1", "A0", &grid),
            RangeSummary { sum: 1.0, count: 2.0 }
        );
    }

    #[test]
    fn test_summary_matches_full_walk() {
        let grid = grid_with(&[(0, 0, "1.5"), (2, 3, "4"), (4, 4, "x"), (3, 1, "-2")]);
        for (start, end) in [("A1", "E5"), ("B2", "G9"), ("A0", "C3"), ("D4", "D4")] {
            let walked = values(start, end, &grid);
            let summary = summarize_range(start, end, &grid);
            assert_eq!(summary.sum, walked.iter().sum::<f64>(), "{}:{}", start, end);
            assert_eq!(summary.count, walked.len() as f64, "{}:{}", start, end);
        }
    }

    #[test]
    fn test_huge_range_sums_populated_cells() {
        let grid = grid_with(&[(0, 0, "5"), (4, 4, "2")]);
        assert_eq!(
            summarize_range("A1", "A2000000", &grid),
            RangeSummary { sum: 5.0, count: 2_000_000.0 }
        );
        assert_eq!(
            summarize_range("A1", "ZZ9999", &grid),
            RangeSummary { sum: 7.0, count: 702.0 * 9999.0 }
        );
    }

    #[test]
    fn test_range_entirely_outside_grid() {
        let grid = grid_with(&[(0, 0, "5")]);
        assert_eq!(
            summarize_range("F1", "G2", &grid),
            RangeSummary { sum: 0.0, count: 4.0 }
        );
        assert_eq!(
            summarize_range("A6", "A7", &grid),
            RangeSummary { sum: 0.0, count: 2.0 }
        );
    }
}
