//! Key translation layer.
//!
//! Maps key events to [`Action`]s per [`Mode`], keeping key handling separate
//! from app behaviour. Text entry keys in Edit and Command mode are not bound
//! here; they fall through to the buffer editors in `actions.rs`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::Mode;

/// Something the user asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Cancel,
    EnterEdit,
    CommitEdit,
    EnterCommand,
    ExecuteCommand,
    Undo,
    Redo,
    ClearCell,
    Move(i32, i32),
    Page(i32),
    HomeCol,
    EndCol,
    GotoFirst,
    OpenHelp,
    ConfirmResize,
    RejectResize,
}

/// Translate a key event to an action for the current mode.
///
/// Returns `None` if the key has no binding in that mode.
pub fn translate(mode: Mode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match mode {
        Mode::Normal => match key.code {
            KeyCode::Char('u') => Some(Action::Undo),
            KeyCode::Char('r') if ctrl => Some(Action::Redo),

            KeyCode::Up | KeyCode::Char('k') => Some(Action::Move(0, -1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Move(0, 1)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(-1, 0)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(1, 0)),
            KeyCode::Tab => Some(Action::Move(1, 0)),
            KeyCode::BackTab => Some(Action::Move(-1, 0)),

            KeyCode::PageUp => Some(Action::Page(-1)),
            KeyCode::PageDown => Some(Action::Page(1)),
            KeyCode::Home if ctrl => Some(Action::GotoFirst),
            KeyCode::Home => Some(Action::HomeCol),
            KeyCode::End => Some(Action::EndCol),

            KeyCode::Enter | KeyCode::Char('i') => Some(Action::EnterEdit),
            KeyCode::Char('x') | KeyCode::Delete => Some(Action::ClearCell),
            KeyCode::Char(':') => Some(Action::EnterCommand),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Action::OpenHelp),
            _ => None,
        },

        Mode::Edit => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::CommitEdit),
            _ => None,
        },

        Mode::Command => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::ExecuteCommand),
            _ => None,
        },

        Mode::ConfirmResize => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ConfirmResize),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::RejectResize),
            _ => None,
        },
    }
}

/// One-line key summary for the status bar.
pub fn status_hint() -> &'static str {
    "hjkl:move  i:edit  x:clear  u:undo  C-r:redo  :resize R C  :w:save  :q:quit  ?:help"
}
