//! Help text content for the help modal

use sheetcalc_engine::builtins::RANGE_BUILTINS;

/// Get keybinding help text
pub fn get_help_text() -> Vec<String> {
    vec![
        "Navigation:",
        "  h/j/k/l      Move left/down/up/right",
        "  Arrow keys   Move cursor",
        "  Tab          Move right",
        "  PageUp/Down  Scroll by page",
        "  Home/End     First/last column",
        "  Ctrl+Home    Go to A1",
        "",
        "Editing:",
        "  i / Enter    Edit cell (raw input)",
        "  Enter        Commit edit",
        "  Esc          Cancel edit",
        "  x / Delete   Clear cell",
        "",
        "Undo/Redo:",
        "  u            Undo",
        "  Ctrl+r       Redo",
        "",
        "Other:",
        "  :            Enter command mode",
        "  ?            This help",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Get command help text
pub fn get_commands_help() -> Vec<String> {
    vec![
        "Commands",
        "",
        "Session:",
        "  :w [file]       Save session",
        "  :q              Quit",
        "  :q!             Force quit",
        "  :wq             Save and quit",
        "",
        "Grid:",
        "  :resize R C     Resize (clears the grid, asks y/n)",
        "  :undo           Undo",
        "  :redo           Redo",
        "  :goto <cell>    Go to cell (e.g. :goto B7)",
        "",
        "Press Esc or q to close",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Get formula help text, including every range function.
pub fn get_functions_help() -> Vec<String> {
    let mut lines = vec![
        "Formulas".to_string(),
        String::new(),
        "Syntax:".to_string(),
        "  =<expr>         Formula; anything else is text".to_string(),
        "  + - * / ( )     Arithmetic".to_string(),
        "  A1, AA10        Cell value (text uses its leading number, else 0)".to_string(),
        "  #ERR            Shown when the formula cannot be evaluated".to_string(),
        String::new(),
        "Range functions:".to_string(),
    ];
    for builtin in RANGE_BUILTINS {
        let usage = format!("{}(A1:B3)", builtin.sheet_name);
        lines.push(format!("  {:<15} {}", usage, builtin.description));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functions_help_lists_every_range_builtin() {
        let help = get_functions_help();
        for builtin in RANGE_BUILTINS {
            assert!(
                help.iter().any(|line| line.contains(builtin.sheet_name)
                    && line.contains(builtin.description)),
                "missing {}",
                builtin.sheet_name
            );
        }
    }

    #[test]
    fn commands_help_mentions_resize() {
        assert!(get_commands_help().iter().any(|l| l.contains(":resize")));
    }
}
