//! Application state and logic.
//!
//! [`App`] wraps the grid state store ([`Document`]) with everything the
//! terminal shell needs on top: cursor and viewport, edit and command buffers,
//! the resize confirmation gate, and the status line. The app operates in
//! [`Mode`]s similar to Vim's modal editing.

use sheetcalc_core::{CellRef, Document, MAX_CELLS};
use sheetcalc_engine::engine::strict_number;
use std::path::PathBuf;

/// Prompt shown before a resize wipes the grid.
pub const RESIZE_PROMPT: &str = "Changing size will clear the grid. Continue?";

/// Modal editing state for the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Navigate the grid, execute single-key commands.
    Normal,
    /// Edit the raw input of the current cell.
    Edit,
    /// Enter ex-style commands (`:w`, `:q`, `:resize`, etc.).
    Command,
    /// Waiting for y/n before applying a pending resize.
    ConfirmResize,
}

pub struct App {
    /// The grid state store
    pub doc: Document,
    /// Current cursor position (row)
    pub cursor_row: usize,
    /// Current cursor position (column)
    pub cursor_col: usize,
    /// Viewport offset (row)
    pub viewport_row: usize,
    /// Viewport offset (column)
    pub viewport_col: usize,
    /// Number of visible rows
    pub visible_rows: usize,
    /// Number of visible columns
    pub visible_cols: usize,
    /// Current mode
    pub mode: Mode,
    /// Edit buffer for cell editing
    pub edit_buffer: String,
    /// Cursor position within edit buffer (byte offset)
    pub edit_cursor: usize,
    /// Command buffer for command mode
    pub command_buffer: String,
    /// Cursor position within command buffer (byte offset)
    pub command_cursor: usize,
    /// Status message to display
    pub status_message: String,
    /// Column width for display
    pub col_width: usize,
    /// Save the session after every store action
    pub autosave: bool,
    /// Dimensions waiting for confirmation
    pub pending_resize: Option<(usize, usize)>,
    /// Help modal state
    pub help_modal: bool,
    pub help_scroll: usize,
}

impl App {
    pub fn new(doc: Document, col_width: usize, autosave: bool) -> Self {
        let mut app = App {
            doc,
            cursor_row: 0,
            cursor_col: 0,
            viewport_row: 0,
            viewport_col: 0,
            visible_rows: 20,
            visible_cols: 8,
            mode: Mode::Normal,
            edit_buffer: String::new(),
            edit_cursor: 0,
            command_buffer: String::new(),
            command_cursor: 0,
            status_message: String::new(),
            col_width,
            autosave,
            pending_resize: None,
            help_modal: false,
            help_scroll: 0,
        };
        app.sync_cursor_from_selection();
        app
    }

    /// Get the current cell reference
    pub fn current_cell_ref(&self) -> CellRef {
        CellRef::new(self.cursor_row, self.cursor_col)
    }

    /// Display value of a cell; empty when out of range.
    pub fn cell_display(&self, row: usize, col: usize) -> String {
        self.doc
            .cell(row, col)
            .map(|cell| cell.value.display())
            .unwrap_or_default()
    }

    /// Place the cursor on the store's selection, or select `A1`.
    fn sync_cursor_from_selection(&mut self) {
        match self.doc.selection() {
            Some(sel) => {
                self.cursor_row = sel.row;
                self.cursor_col = sel.col;
                self.update_viewport();
            }
            None => {
                self.cursor_row = 0;
                self.cursor_col = 0;
                self.select_cursor();
            }
        }
    }

    /// Move cursor by delta, clamping to the grid
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let max_col = self.doc.cols().saturating_sub(1);
        let max_row = self.doc.rows().saturating_sub(1);
        self.cursor_col = offset_clamped(self.cursor_col, dx, max_col);
        self.cursor_row = offset_clamped(self.cursor_row, dy, max_row);
        self.select_cursor();
    }

    pub fn move_to(&mut self, row: usize, col: usize) {
        self.cursor_row = row.min(self.doc.rows().saturating_sub(1));
        self.cursor_col = col.min(self.doc.cols().saturating_sub(1));
        self.select_cursor();
    }

    fn select_cursor(&mut self) {
        if let Err(e) = self.doc.select_cell(self.cursor_row, self.cursor_col) {
            self.status_message = format!("Error: {}", e);
        }
        self.update_viewport();
    }

    /// Update viewport to keep cursor visible
    pub fn update_viewport(&mut self) {
        // Horizontal scrolling
        if self.cursor_col < self.viewport_col {
            self.viewport_col = self.cursor_col;
        } else if self.cursor_col >= self.viewport_col + self.visible_cols {
            self.viewport_col = self.cursor_col + 1 - self.visible_cols;
        }

        // Vertical scrolling
        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        } else if self.cursor_row >= self.viewport_row + self.visible_rows {
            self.viewport_row = self.cursor_row + 1 - self.visible_rows;
        }
    }

    /// Enter edit mode with the current cell's raw input
    pub fn enter_edit_mode(&mut self) {
        self.edit_buffer = self
            .doc
            .cell(self.cursor_row, self.cursor_col)
            .map(|cell| cell.formula.clone())
            .unwrap_or_default();
        self.edit_cursor = self.edit_buffer.len();
        self.mode = Mode::Edit;
    }

    /// Commit the current edit
    pub fn commit_edit(&mut self) {
        let raw = std::mem::take(&mut self.edit_buffer);
        self.edit_cursor = 0;
        self.mode = Mode::Normal;
        self.set_current_cell(&raw);
    }

    pub fn clear_current_cell(&mut self) {
        self.set_current_cell("");
    }

    fn set_current_cell(&mut self, raw: &str) {
        match self.doc.update_cell(self.cursor_row, self.cursor_col, raw) {
            Ok(()) => {
                self.status_message.clear();
                self.after_change();
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    pub fn undo(&mut self) {
        match self.doc.undo() {
            Ok(()) => {
                self.status_message = "Undone".to_string();
                self.after_change();
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    pub fn redo(&mut self) {
        match self.doc.redo() {
            Ok(()) => {
                self.status_message = "Redone".to_string();
                self.after_change();
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    /// Validate `:resize` arguments and open the confirmation gate.
    pub fn request_resize(&mut self, args: Option<&str>) {
        let parts: Vec<&str> = args.unwrap_or("").split_whitespace().collect();
        let [rows_text, cols_text] = parts.as_slice() else {
            self.status_message = "Usage: :resize ROWS COLS".to_string();
            return;
        };
        let (Some(rows), Some(cols)) = (parse_dimension(rows_text), parse_dimension(cols_text))
        else {
            self.status_message = format!("Invalid size: {} x {}", rows_text, cols_text);
            return;
        };
        if rows.checked_mul(cols).is_none_or(|cells| cells > MAX_CELLS) {
            self.status_message =
                format!("Grid too large: {} x {} (max {} cells)", rows, cols, MAX_CELLS);
            return;
        }
        self.pending_resize = Some((rows, cols));
        self.mode = Mode::ConfirmResize;
        self.status_message = format!("{} (y/n)", RESIZE_PROMPT);
    }

    /// Apply or drop the pending resize.
    pub fn finish_resize(&mut self, accepted: bool) {
        self.mode = Mode::Normal;
        let Some((rows, cols)) = self.pending_resize.take() else {
            return;
        };
        if !accepted {
            self.status_message = "Resize cancelled".to_string();
            return;
        }
        match self.doc.set_dimensions(rows, cols) {
            Ok(()) => {
                self.status_message = format!("Resized to {} x {}", rows, cols);
                self.viewport_row = 0;
                self.viewport_col = 0;
                let (row, col) = (self.cursor_row, self.cursor_col);
                self.move_to(row, col);
                self.after_change();
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    pub fn goto_cell(&mut self, label: &str) {
        let label = label.trim().to_uppercase();
        match CellRef::from_str(&label) {
            Some(cell_ref) if cell_ref.row < self.doc.rows() && cell_ref.col < self.doc.cols() => {
                self.move_to(cell_ref.row, cell_ref.col);
            }
            Some(_) => self.status_message = format!("{} is outside the grid", label),
            None => self.status_message = format!("Invalid cell reference: {}", label),
        }
    }

    /// Persist after a store action when autosave is on. Failures only surface
    /// in the status line.
    fn after_change(&mut self) {
        if !self.autosave || self.doc.session_path().is_none() {
            return;
        }
        if let Err(e) = self.doc.save_session() {
            self.status_message = format!("Error saving: {}", e);
        }
    }

    /// Save to the session path
    pub fn save_session(&mut self) {
        match self.doc.save_session() {
            Ok(path) => self.status_message = format!("Saved to {}", path.display()),
            Err(sheetcalc_core::SheetError::NoSessionPath) => {
                self.status_message = "No session path. Use :w <path>".to_string();
            }
            Err(e) => self.status_message = format!("Error saving: {}", e),
        }
    }

    /// Execute the command buffer. Returns `true` if the app should quit.
    pub fn execute_command(&mut self) -> bool {
        let cmd = self.command_buffer.trim().to_string();
        self.command_buffer.clear();
        self.command_cursor = 0;
        self.mode = Mode::Normal;

        let (command, args) = match cmd.split_once(' ') {
            Some((command, rest)) => (command, Some(rest.trim())),
            None => (cmd.as_str(), None),
        };

        match command {
            "" => {}
            "q" | "quit" => {
                if self.doc.is_modified() {
                    self.status_message =
                        "Unsaved changes! Use :q! to force quit or :wq to save and quit"
                            .to_string();
                    return false;
                }
                return true;
            }
            "q!" => return true,
            "w" | "save" => {
                if let Some(path) = args.filter(|p| !p.is_empty()) {
                    self.doc.set_session_path(Some(PathBuf::from(path)));
                }
                self.save_session();
            }
            "wq" => {
                self.save_session();
                if !self.doc.is_modified() {
                    return true;
                }
            }
            "resize" | "size" => self.request_resize(args),
            "undo" => self.undo(),
            "redo" => self.redo(),
            "goto" | "g" => {
                if let Some(label) = args {
                    self.goto_cell(label);
                } else {
                    self.status_message = "Usage: :goto CELL (e.g., :goto B7)".to_string();
                }
            }
            "help" | "h" => self.open_help(),
            _ => {
                self.status_message = format!("Unknown command: {}", command);
            }
        }
        false
    }

    pub fn open_help(&mut self) {
        self.help_modal = true;
        self.help_scroll = 0;
    }

    pub fn close_help_modal(&mut self) {
        self.help_modal = false;
    }

    pub fn scroll_help_by(&mut self, delta: i32) {
        self.help_scroll = offset_clamped(self.help_scroll, delta, usize::MAX);
    }
}

fn offset_clamped(value: usize, delta: i32, max: usize) -> usize {
    let moved = if delta < 0 {
        value.saturating_sub(delta.unsigned_abs() as usize)
    } else {
        value.saturating_add(delta as usize)
    };
    moved.min(max)
}

/// Coerce resize text the way a numeric form field would: strict numeric
/// parse, truncated toward zero. Zero, negative and non-finite sizes are
/// rejected.
pub fn parse_dimension(text: &str) -> Option<usize> {
    let n = strict_number(text)?;
    if !n.is_finite() || n < 1.0 {
        return None;
    }
    Some(n.trunc() as usize)
}
