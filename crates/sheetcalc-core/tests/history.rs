//! Store behaviour through the public API: edits, history and resizing.

use sheetcalc_core::{CellRef, CellValue, Document, SheetError};

fn display(doc: &Document, label: &str) -> String {
    let cell_ref = CellRef::from_str(label).unwrap();
    doc.cell(cell_ref.row, cell_ref.col).unwrap().value.display()
}

fn set(doc: &mut Document, label: &str, raw: &str) {
    let cell_ref = CellRef::from_str(label).unwrap();
    doc.update_cell(cell_ref.row, cell_ref.col, raw).unwrap();
}

#[test]
fn formulas_read_values_at_edit_time() {
    let mut doc = Document::new();
    set(&mut doc, "A1", "1");
    set(&mut doc, "A2", "2");
    set(&mut doc, "A3", "3");
    set(&mut doc, "B1", "=SUM(A1:A3)");
    set(&mut doc, "B2", "=AVERAGE(A1:A2)");
    set(&mut doc, "B3", "=B1*B2-A3");
    assert_eq!(display(&doc, "B1"), "6");
    assert_eq!(display(&doc, "B2"), "1.5");
    assert_eq!(display(&doc, "B3"), "6");

    // No recalculation of dependents.
    set(&mut doc, "A1", "100");
    assert_eq!(display(&doc, "B1"), "6");
}

#[test]
fn error_marker_and_infinity_are_cell_values() {
    let mut doc = Document::new();
    set(&mut doc, "A1", "5");
    set(&mut doc, "A2", "=A1/0");
    set(&mut doc, "A3", "=A1+");
    assert_eq!(
        doc.cell(1, 0).unwrap().value,
        CellValue::Number(f64::INFINITY)
    );
    assert!(doc.cell(2, 0).unwrap().value.is_error());
    assert_eq!(display(&doc, "A3"), "#ERR");
}

#[test]
fn undo_restores_exact_pre_update_grid() {
    let mut doc = Document::with_dimensions(3, 3).unwrap();
    set(&mut doc, "A1", "2");
    set(&mut doc, "B1", "=A1*A1");
    let before = doc.grid().clone();
    set(&mut doc, "C3", "=B1+1");
    let after = doc.grid().clone();

    doc.undo().unwrap();
    assert_eq!(doc.grid(), &before);
    doc.redo().unwrap();
    assert_eq!(doc.grid(), &after);
}

#[test]
fn history_walks_back_to_the_empty_grid() {
    let mut doc = Document::new();
    let empty = doc.grid().clone();
    for (i, raw) in ["a", "b", "=1+1", "c"].iter().enumerate() {
        doc.update_cell(i, i, raw).unwrap();
    }
    while doc.can_undo() {
        doc.undo().unwrap();
    }
    assert_eq!(doc.grid(), &empty);
    assert_eq!(doc.future_len(), 4);
    assert!(matches!(doc.undo(), Err(SheetError::NothingToUndo)));

    while doc.can_redo() {
        doc.redo().unwrap();
    }
    assert_eq!(display(&doc, "C3"), "2");
    assert_eq!(display(&doc, "D4"), "c");
}

#[test]
fn resize_discards_everything() {
    let mut doc = Document::new();
    set(&mut doc, "A1", "x");
    set(&mut doc, "B1", "y");
    doc.undo().unwrap();

    doc.set_dimensions(2, 28).unwrap();
    assert_eq!(doc.grid()[1][27].id, "AB2");
    assert!(!doc.can_undo());
    assert!(!doc.can_redo());
    assert!(doc.grid().iter().flatten().all(|c| c.formula.is_empty()));
}

#[test]
fn out_of_range_edits_are_rejected() {
    let mut doc = Document::with_dimensions(2, 2).unwrap();
    assert!(matches!(
        doc.update_cell(0, 2, "1"),
        Err(SheetError::OutOfBounds { rows: 2, cols: 2, .. })
    ));
    assert!(!doc.can_undo());
}
