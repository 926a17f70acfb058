use super::Document;
use crate::error::{Result, SheetError};
use crate::storage::{Session, parse_session, write_session};
use log::{debug, warn};
use sheetcalc_engine::engine::create_grid;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// What [`Document::load_session`] did with the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The saved state was restored.
    Restored,
    /// No file existed; the store is empty.
    Fresh,
    /// The file was unreadable or malformed; the store was reset.
    Reset { reason: String },
}

impl Document {
    /// Snapshot the full store state for saving.
    pub fn to_session(&self) -> Session {
        Session {
            rows: self.rows,
            cols: self.cols,
            grid: self.grid.clone(),
            selection: self.selection,
            past: self.past.clone(),
            future: self.future.iter().cloned().collect(),
        }
    }

    /// Save to the current session path.
    /// Returns the path saved to.
    pub fn save_session(&mut self) -> Result<PathBuf> {
        let Some(path) = self.session_path.clone() else {
            return Err(SheetError::NoSessionPath);
        };
        self.save_session_to(&path)?;
        Ok(path)
    }

    /// Save to an explicit path without changing the session path.
    pub fn save_session_to(&mut self, path: &Path) -> Result<()> {
        write_session(path, &self.to_session())?;
        self.modified = false;
        debug!("saved session to {}", path.display());
        Ok(())
    }

    /// Replace the store state with the session saved at `path`.
    ///
    /// Never fails: a missing file leaves an empty grid of the current size,
    /// and an unreadable or malformed one resets to that same empty grid with a
    /// warning. The session path is set to `path` in every case.
    pub fn load_session(&mut self, path: &Path) -> LoadOutcome {
        self.session_path = Some(path.to_path_buf());
        self.modified = false;

        if !path.exists() {
            self.reset();
            return LoadOutcome::Fresh;
        }

        let session = match parse_session(path) {
            Ok(session) => session,
            Err(e) => return self.reset_with_warning(path, e.to_string()),
        };
        if let Err(reason) = session.validate() {
            return self.reset_with_warning(path, reason);
        }

        self.rows = session.rows;
        self.cols = session.cols;
        self.grid = session.grid;
        self.selection = session.selection;
        self.past = session.past;
        self.future = VecDeque::from(session.future);
        self.enforce_history_limit();
        debug!(
            "restored {}x{} session from {} (past={}, future={})",
            self.rows,
            self.cols,
            path.display(),
            self.past.len(),
            self.future.len()
        );
        LoadOutcome::Restored
    }

    /// Build a `rows x cols` store backed by the session file at `path`.
    pub fn open_session(path: &Path, rows: usize, cols: usize) -> Result<(Document, LoadOutcome)> {
        let mut doc = Document::with_dimensions(rows, cols)?;
        let outcome = doc.load_session(path);
        Ok((doc, outcome))
    }

    fn reset(&mut self) {
        self.grid = create_grid(self.rows, self.cols);
        self.selection = None;
        self.past.clear();
        self.future.clear();
    }

    fn reset_with_warning(&mut self, path: &Path, reason: String) -> LoadOutcome {
        warn!(
            "discarding session {}: {}; starting with an empty {}x{} grid",
            path.display(),
            reason,
            self.rows,
            self.cols
        );
        self.reset();
        LoadOutcome::Reset { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Selection;
    use sheetcalc_engine::engine::CellValue;
    use std::fs;

    #[test]
    fn test_save_without_path_fails() {
        let mut doc = Document::new();
        assert!(matches!(doc.save_session(), Err(SheetError::NoSessionPath)));
    }

    #[test]
    fn test_save_and_restore_full_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut doc = Document::with_dimensions(4, 3).unwrap();
        doc.set_session_path(Some(path.clone()));
        doc.update_cell(0, 0, "2").unwrap();
        doc.update_cell(0, 1, "=A1*3").unwrap();
        doc.update_cell(3, 2, "note").unwrap();
        doc.undo().unwrap();
        doc.select_cell(1, 2).unwrap();
        assert!(doc.is_modified());
        assert_eq!(doc.save_session().unwrap(), path);
        assert!(!doc.is_modified());

        let mut restored = Document::new();
        assert_eq!(restored.load_session(&path), LoadOutcome::Restored);
        assert_eq!((restored.rows(), restored.cols()), (4, 3));
        assert_eq!(restored.grid(), doc.grid());
        assert_eq!(restored.selection(), Some(Selection { row: 1, col: 2 }));
        assert_eq!((restored.past_len(), restored.future_len()), (2, 1));

        restored.redo().unwrap();
        assert_eq!(restored.cell(3, 2).unwrap().value, CellValue::Text("note".into()));
        restored.undo().unwrap();
        restored.undo().unwrap();
        assert!(restored.cell(0, 1).unwrap().value.is_empty());
    }

    #[test]
    fn test_missing_file_is_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let (doc, outcome) = Document::open_session(&path, 5, 6).unwrap();
        assert_eq!(outcome, LoadOutcome::Fresh);
        assert_eq!((doc.rows(), doc.cols()), (5, 6));
        assert_eq!(doc.session_path(), Some(&path));
    }

    #[test]
    fn test_malformed_file_resets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let mut doc = Document::new();
        doc.update_cell(0, 0, "x").unwrap();
        let outcome = doc.load_session(&path);
        assert!(matches!(outcome, LoadOutcome::Reset { .. }));
        assert_eq!((doc.rows(), doc.cols()), (10, 10));
        assert!(doc.cell(0, 0).unwrap().value.is_empty());
        assert_eq!(doc.past_len(), 0);
    }

    #[test]
    fn test_shape_mismatch_resets_to_current_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = Document::with_dimensions(2, 2).unwrap().to_session();
        session.past.push(create_grid(3, 2));
        write_session(&path, &session).unwrap();

        let (doc, outcome) = Document::open_session(&path, 7, 7).unwrap();
        match outcome {
            LoadOutcome::Reset { reason } => assert!(reason.contains("past[0]")),
            other => panic!("expected reset, got {:?}", other),
        }
        assert_eq!((doc.rows(), doc.cols()), (7, 7));
    }

    #[test]
    fn test_restore_applies_history_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut doc = Document::new();
        for text in ["1", "2", "3"] {
            doc.update_cell(0, 0, text).unwrap();
        }
        doc.save_session_to(&path).unwrap();

        let mut limited = Document::new().with_history_limit(Some(1));
        assert_eq!(limited.load_session(&path), LoadOutcome::Restored);
        assert_eq!(limited.past_len(), 1);
    }
}
