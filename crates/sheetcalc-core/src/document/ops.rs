use super::state::check_dimensions;
use super::{Document, Selection};
use crate::error::{Result, SheetError};
use log::debug;
use sheetcalc_engine::engine::{CellRef, CellValue, Grid, create_grid, evaluate_formula};

impl Document {
    /// Record the pre-edit grid and drop the redo timeline.
    fn push_past(&mut self, snapshot: Grid) {
        self.past.push(snapshot);
        self.enforce_history_limit();
    }

    /// Set a cell from raw user input.
    ///
    /// The new grid differs from the current one only at `(row, col)`. A
    /// formula is evaluated against the new grid with its own raw text already
    /// in place, so a self-reference reads that text rather than the old value.
    pub fn update_cell(&mut self, row: usize, col: usize, raw_input: &str) -> Result<()> {
        self.check_bounds(row, col)?;

        let mut next = self.grid.clone();
        {
            let cell = &mut next[row][col];
            cell.formula = raw_input.to_string();
            cell.value = CellValue::Text(raw_input.to_string());
        }
        if raw_input.starts_with('=') {
            let value = evaluate_formula(raw_input, &next);
            next[row][col].value = value;
        }

        let previous = std::mem::replace(&mut self.grid, next);
        self.push_past(previous);
        self.future.clear();
        self.modified = true;

        debug!(
            "update {} = {:?} -> {:?}",
            CellRef::new(row, col),
            raw_input,
            self.grid[row][col].value
        );
        Ok(())
    }

    /// Restore the most recent snapshot. State is unchanged when there is none.
    pub fn undo(&mut self) -> Result<()> {
        let previous = self.past.pop().ok_or(SheetError::NothingToUndo)?;
        let current = std::mem::replace(&mut self.grid, previous);
        self.future.push_front(current);
        self.modified = true;
        debug!("undo (past={}, future={})", self.past.len(), self.future.len());
        Ok(())
    }

    /// Re-apply the nearest undone snapshot. State is unchanged when there is none.
    pub fn redo(&mut self) -> Result<()> {
        let next = self.future.pop_front().ok_or(SheetError::NothingToRedo)?;
        let current = std::mem::replace(&mut self.grid, next);
        self.push_past(current);
        self.modified = true;
        debug!("redo (past={}, future={})", self.past.len(), self.future.len());
        Ok(())
    }

    /// Replace the grid with a fresh empty one and clear all history.
    ///
    /// A selection that no longer fits is dropped.
    pub fn set_dimensions(&mut self, rows: usize, cols: usize) -> Result<()> {
        check_dimensions(rows, cols)?;

        self.rows = rows;
        self.cols = cols;
        self.grid = create_grid(rows, cols);
        self.past.clear();
        self.future.clear();
        if self
            .selection
            .is_some_and(|sel| sel.row >= rows || sel.col >= cols)
        {
            self.selection = None;
        }
        self.modified = true;
        debug!("resize to {}x{}", rows, cols);
        Ok(())
    }

    /// Point the selection at a cell. Not recorded in history.
    pub fn select_cell(&mut self, row: usize, col: usize) -> Result<()> {
        self.check_bounds(row, col)?;
        self.selection = Some(Selection { row, col });
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }
}
