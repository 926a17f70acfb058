use crate::document::Selection;
use serde::{Deserialize, Serialize};
use sheetcalc_engine::engine::Grid;

/// Serialized form of a [`Document`](crate::Document).
///
/// `past` is oldest first and `future` nearest first, matching the in-memory
/// stacks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub rows: usize,
    pub cols: usize,
    pub grid: Grid,
    #[serde(default)]
    pub selection: Option<Selection>,
    #[serde(default)]
    pub past: Vec<Grid>,
    #[serde(default)]
    pub future: Vec<Grid>,
}

impl Session {
    /// Check that the grid and every snapshot are `rows x cols`, and that the
    /// selection (if any) lies inside.
    ///
    /// Returns a description of the first mismatch.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.rows == 0 || self.cols == 0 {
            return Err(format!("empty dimensions {}x{}", self.rows, self.cols));
        }
        check_shape("grid", &self.grid, self.rows, self.cols)?;
        for (i, snapshot) in self.past.iter().enumerate() {
            check_shape(&format!("past[{}]", i), snapshot, self.rows, self.cols)?;
        }
        for (i, snapshot) in self.future.iter().enumerate() {
            check_shape(&format!("future[{}]", i), snapshot, self.rows, self.cols)?;
        }
        if let Some(sel) = self.selection {
            if sel.row >= self.rows || sel.col >= self.cols {
                return Err(format!("selection ({}, {}) outside grid", sel.row, sel.col));
            }
        }
        Ok(())
    }
}

fn check_shape(name: &str, grid: &Grid, rows: usize, cols: usize) -> std::result::Result<(), String> {
    if grid.len() != rows {
        return Err(format!("{} has {} rows, expected {}", name, grid.len(), rows));
    }
    if let Some((r, row)) = grid.iter().enumerate().find(|(_, row)| row.len() != cols) {
        return Err(format!(
            "{} row {} has {} cells, expected {}",
            name,
            r,
            row.len(),
            cols
        ));
    }
    Ok(())
}
