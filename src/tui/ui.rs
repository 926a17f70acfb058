//! UI rendering

use super::app::{App, Mode, RESIZE_PROMPT};
use super::help::{get_commands_help, get_functions_help, get_help_text};
use super::keymap::status_hint;
use sheetcalc_core::CellRef;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

pub(crate) const FORMULA_BAR_HEIGHT: u16 = 3;
pub(crate) const GRID_MIN_HEIGHT: u16 = 5;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const ROW_HEADER_WIDTH: u16 = 5;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FORMULA_BAR_HEIGHT),
            Constraint::Min(GRID_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Map a terminal position inside the grid block to `(row, col)`.
pub(crate) fn grid_cell_at(
    app: &App,
    grid_area: Rect,
    mouse_col: u16,
    mouse_row: u16,
) -> Option<(usize, usize)> {
    if grid_area.width < 3 || grid_area.height < 4 {
        return None;
    }

    let inner_x = grid_area.x.saturating_add(1);
    let inner_y = grid_area.y.saturating_add(1);
    let inner_right = inner_x.saturating_add(grid_area.width.saturating_sub(2));
    let inner_bottom = inner_y.saturating_add(grid_area.height.saturating_sub(2));

    if mouse_col < inner_x
        || mouse_col >= inner_right
        || mouse_row < inner_y
        || mouse_row >= inner_bottom
    {
        return None;
    }

    // Header row contains column letters, not data cells.
    if mouse_row == inner_y {
        return None;
    }

    let rel_row = (mouse_row - inner_y - 1) as usize;
    if rel_row >= app.visible_rows {
        return None;
    }
    let row = app.viewport_row + rel_row;
    if row >= app.doc.rows() {
        return None;
    }

    let first_cell_x = inner_x + ROW_HEADER_WIDTH + GRID_COLUMN_SPACING;
    if mouse_col < first_cell_x {
        return None;
    }

    let stride = app.col_width + GRID_COLUMN_SPACING as usize;
    let rel_x = (mouse_col - first_cell_x) as usize;
    if rel_x % stride >= app.col_width {
        return None;
    }
    let rel_col = rel_x / stride;
    if rel_col >= app.visible_cols {
        return None;
    }
    let col = app.viewport_col + rel_col;
    if col >= app.doc.cols() {
        return None;
    }

    Some((row, col))
}

/// Draw the application UI
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = split_main_chunks(f.area());

    // Update visible dimensions based on actual size
    let grid_area = chunks[1];
    let available_width =
        grid_area
            .width
            .saturating_sub(ROW_HEADER_WIDTH + GRID_COLUMN_SPACING + 2) as usize;
    let available_height = grid_area.height.saturating_sub(3) as usize; // header + borders

    app.visible_cols = (available_width / (app.col_width + GRID_COLUMN_SPACING as usize)).max(1);
    app.visible_rows = available_height.max(1);
    app.update_viewport();

    draw_formula_bar(f, app, chunks[0]);
    draw_grid(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if app.mode == Mode::ConfirmResize {
        draw_confirm_modal(f, app);
    }

    if app.help_modal {
        draw_help_modal(f, app);
    }
}

fn draw_formula_bar(f: &mut Frame, app: &App, area: Rect) {
    let cell_name = app.current_cell_ref().to_string();

    let content = match app.mode {
        Mode::Edit => {
            let (before, after) = app.edit_buffer.split_at(app.edit_cursor);
            format!("{}: {}│{}", cell_name, before, after)
        }
        Mode::Command => {
            let (before, after) = app.command_buffer.split_at(app.command_cursor);
            format!(":{}│{}", before, after)
        }
        Mode::Normal | Mode::ConfirmResize => {
            match app.doc.cell(app.cursor_row, app.cursor_col) {
                Some(cell) if !cell.formula.is_empty() => {
                    format!("{}: {}", cell_name, cell.formula)
                }
                _ => format!("{}: (empty)", cell_name),
            }
        }
    };

    let title = match app.mode {
        Mode::Edit => " Edit ",
        Mode::Command => " Command ",
        Mode::Normal | Mode::ConfirmResize => " Cell ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(match app.mode {
            Mode::Edit => Color::Yellow,
            Mode::Command => Color::Cyan,
            Mode::Normal | Mode::ConfirmResize => Color::White,
        }));

    let paragraph = Paragraph::new(content).block(block);
    f.render_widget(paragraph, area);
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let last_col = (app.viewport_col + app.visible_cols).min(app.doc.cols());
    let last_row = (app.viewport_row + app.visible_rows).min(app.doc.rows());

    let header_style = |active: bool| {
        if active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let mut header_cells = vec![Cell::from(" ")]; // Corner
    for col in app.viewport_col..last_col {
        header_cells.push(
            Cell::from(CellRef::col_to_letters(col)).style(header_style(col == app.cursor_col)),
        );
    }
    let header = Row::new(header_cells).height(1);

    let mut rows = Vec::new();
    for row in app.viewport_row..last_row {
        let mut cells = vec![Cell::from((row + 1).to_string()).style(header_style(row == app.cursor_row))];

        for col in app.viewport_col..last_col {
            let Some(cell) = app.doc.cell(row, col) else {
                continue;
            };
            let display = cell.value.display();
            let is_cursor = row == app.cursor_row && col == app.cursor_col;

            let style = if is_cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if cell.value.is_error() {
                Style::default().fg(Color::Red)
            } else if cell.is_formula() {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };

            cells.push(Cell::from(display).style(style));
        }

        rows.push(Row::new(cells));
    }

    let mut widths = vec![Constraint::Length(ROW_HEADER_WIDTH)];
    widths.extend((app.viewport_col..last_col).map(|_| Constraint::Length(app.col_width as u16)));

    let title = format!(" Sheetcalc {}x{} ", app.doc.rows(), app.doc.cols());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(GRID_COLUMN_SPACING);

    f.render_widget(table, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let session_info = match app.doc.session_path() {
        Some(path) => {
            let modified = if app.doc.is_modified() { " [+]" } else { "" };
            format!("{}{}", path.display(), modified)
        }
        None if app.doc.is_modified() => "[No Session] [+]".to_string(),
        None => "[No Session]".to_string(),
    };

    let history = format!(
        "undo:{} redo:{}",
        app.doc.past_len(),
        app.doc.future_len()
    );

    let status = if !app.status_message.is_empty() {
        app.status_message.clone()
    } else {
        format!("{}  |  {}  |  {}", session_info, history, status_hint())
    };

    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else if !app.status_message.is_empty() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(status, style)]));
    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn draw_confirm_modal(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 25, f.area());
    let modal_style = Style::default().fg(Color::White).bg(Color::Black);

    let target = app
        .pending_resize
        .map(|(rows, cols)| format!("New size: {} x {}", rows, cols))
        .unwrap_or_default();
    let lines = vec![
        Line::from(Span::styled(
            RESIZE_PROMPT,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(target),
        Line::from(""),
        Line::from("[y] Yes    [n] No"),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Resize ")
        .border_style(Style::default().fg(Color::Yellow))
        .style(modal_style);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(modal_style)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn section_lines(texts: Vec<String>, title: &str) -> Vec<Line<'static>> {
    texts
        .into_iter()
        .map(|text| {
            let style = if text == title {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if text.starts_with("  ") {
                Style::default().fg(Color::White)
            } else {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            };
            Line::from(Span::styled(text, style))
        })
        .collect()
}

fn draw_help_modal(f: &mut Frame, app: &App) {
    let area = centered_rect(88, 88, f.area());
    let modal_style = Style::default().fg(Color::White).bg(Color::Black);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Sheetcalc Help ")
        .border_style(Style::default().fg(Color::Green))
        .style(modal_style);

    let mut lines = section_lines(get_help_text(), "");
    lines.push(Line::from(""));
    lines.extend(section_lines(get_functions_help(), "Formulas"));
    lines.push(Line::from(""));
    lines.extend(section_lines(get_commands_help(), "Commands"));

    let viewport_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(viewport_height);
    let effective_scroll = app.help_scroll.min(max_scroll);
    let scroll_y = u16::try_from(effective_scroll).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(modal_style)
        .scroll((scroll_y, 0))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
