//! TUI rendering logic for the grid preview.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::state::{GridPreviewState, PreviewCell};

/// Height of one grid row in terminal lines.
pub const CELL_HEIGHT: u16 = 6;

/// Draws the grid preview UI. Returns how many grid rows fit on screen.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &GridPreviewState, page_title: &str) -> usize {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(CELL_HEIGHT),
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state, page_title);
    let visible_rows = usize::from((chunks[1].height / CELL_HEIGHT).max(1));
    draw_grid(frame, chunks[1], state, visible_rows);
    draw_footer(frame, chunks[2], state);

    visible_rows
}

/// Draws the header with page title and counts.
fn draw_header(frame: &mut Frame, area: Rect, state: &GridPreviewState, page_title: &str) {
    let text = format!(
        "{} stream(s)  {} column(s)  {} row(s)",
        state.cells.len(),
        state.columns(),
        state.rows()
    );
    let header = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {page_title} ")),
    );
    frame.render_widget(header, area);
}

/// Draws the visible grid rows.
#[allow(clippy::arithmetic_side_effects)]
fn draw_grid(frame: &mut Frame, area: Rect, state: &GridPreviewState, visible_rows: usize) {
    if state.cells.is_empty() {
        let empty = Paragraph::new("No streams configured.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let columns = state.columns();
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CELL_HEIGHT); visible_rows])
        .split(area);
    let column_ratio = u32::try_from(columns).unwrap_or(u32::MAX);
    let row_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, column_ratio); columns]);

    for (offset, row_area) in row_areas.iter().enumerate() {
        let row = state.first_row() + offset;
        let cell_areas = row_layout.split(*row_area);
        for (column, cell_area) in cell_areas.iter().enumerate() {
            let index = row * columns + column;
            if let Some(cell) = state.cells.get(index) {
                draw_cell(frame, *cell_area, cell, index == state.cursor());
            }
        }
    }
}

/// Draws one stream cell.
fn draw_cell(frame: &mut Frame, area: Rect, cell: &PreviewCell, selected: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let heading = if cell.heading.is_empty() {
        String::from(" (untitled) ")
    } else {
        format!(" {} ", cell.heading)
    };
    let lines = vec![
        Line::from(cell.text.as_str()),
        Line::from(vec![
            Span::styled("id ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                cell.key.as_str(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            cell.embed_src.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(heading),
    );
    frame.render_widget(paragraph, area);
}

/// Draws the footer with key hints and the selected stream.
fn draw_footer(frame: &mut Frame, area: Rect, state: &GridPreviewState) {
    let selected = state
        .current()
        .map_or_else(String::new, |c| format!("  [{}]", c.key));
    let hints = format!("←↓↑→/hjkl: move  o: open in browser  q: quit{selected}");
    let footer = Paragraph::new(hints).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
