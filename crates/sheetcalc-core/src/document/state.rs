use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};
use sheetcalc_engine::engine::{Cell, Grid, create_grid};
use std::collections::VecDeque;
use std::path::PathBuf;

pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLS: usize = 10;

/// Upper bound on `rows * cols`. Every history entry is a full copy of the grid.
pub const MAX_CELLS: usize = 1_000_000;

/// The selected cell. UI state only; never recorded in history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub row: usize,
    pub col: usize,
}

/// UI-agnostic grid state for the spreadsheet.
///
/// All mutation goes through [`update_cell`](Document::update_cell),
/// [`undo`](Document::undo), [`redo`](Document::redo),
/// [`set_dimensions`](Document::set_dimensions) and
/// [`select_cell`](Document::select_cell). History holds whole-grid snapshots.
#[derive(Clone, Debug)]
pub struct Document {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) grid: Grid,
    pub(crate) selection: Option<Selection>,
    /// Snapshots before each edit, oldest first.
    pub(crate) past: Vec<Grid>,
    /// Undone snapshots, nearest first.
    pub(crate) future: VecDeque<Grid>,
    /// Optional cap on `past`; `None` keeps everything.
    pub(crate) history_limit: Option<usize>,
    /// Where [`save_session`](Document::save_session) writes.
    pub(crate) session_path: Option<PathBuf>,
    /// Whether state changed since the last save or load.
    pub(crate) modified: bool,
}

impl Document {
    /// Create a 10x10 document.
    pub fn new() -> Self {
        Document {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            grid: create_grid(DEFAULT_ROWS, DEFAULT_COLS),
            selection: None,
            past: Vec::new(),
            future: VecDeque::new(),
            history_limit: None,
            session_path: None,
            modified: false,
        }
    }

    /// Create a document of the given size.
    pub fn with_dimensions(rows: usize, cols: usize) -> Result<Self> {
        check_dimensions(rows, cols)?;
        Ok(Document {
            rows,
            cols,
            grid: create_grid(rows, cols),
            ..Self::new()
        })
    }

    /// Cap the number of undo snapshots kept. Oldest entries are dropped first.
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self.enforce_history_limit();
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.grid.get(row).and_then(|r| r.get(col))
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn history_limit(&self) -> Option<usize> {
        self.history_limit
    }

    pub fn session_path(&self) -> Option<&PathBuf> {
        self.session_path.as_ref()
    }

    pub fn set_session_path(&mut self, path: Option<PathBuf>) {
        self.session_path = path;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row < self.rows && col < self.cols {
            Ok(())
        } else {
            Err(SheetError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub(crate) fn enforce_history_limit(&mut self) {
        if let Some(limit) = self.history_limit {
            if self.past.len() > limit {
                let excess = self.past.len() - limit;
                self.past.drain(..excess);
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_dimensions(rows: usize, cols: usize) -> Result<()> {
    let fits = rows
        .checked_mul(cols)
        .is_some_and(|cells| cells <= MAX_CELLS);
    if rows == 0 || cols == 0 || !fits {
        return Err(SheetError::InvalidDimensions { rows, cols });
    }
    Ok(())
}
