//! TUI module for previewing the stream grid in a terminal.
//!
//! Uses `ratatui` + `crossterm` for rendering.

/// Grid preview state types.
pub mod state;
mod ui;

use std::io;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use streamgrid_core::RenderedGrid;

use self::state::{GridPreviewState, PreviewCell};

/// Runs the grid preview TUI until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub fn run_grid_preview(grid: &RenderedGrid, page_title: &str) -> Result<()> {
    let cells: Vec<PreviewCell> = grid.cells().iter().map(PreviewCell::from).collect();
    let mut state = GridPreviewState::new(cells, grid.layout().columns());

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, page_title);

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut GridPreviewState,
    page_title: &str,
) -> Result<()> {
    let mut visible_rows: usize = 1;

    loop {
        state.ensure_visible(visible_rows);
        terminal
            .draw(|frame| {
                visible_rows = ui::draw(frame, state, page_title);
            })
            .context("failed to draw TUI")?;

        if event::poll(std::time::Duration::from_millis(100)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
            && handle_input(state, key.code, key.modifiers)
        {
            return Ok(());
        }
    }
}

/// Handles key input. Returns `true` to exit.
fn handle_input(state: &mut GridPreviewState, key: KeyCode, modifiers: KeyModifiers) -> bool {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Left | KeyCode::Char('h') => state.move_left(),
        KeyCode::Right | KeyCode::Char('l') => state.move_right(),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Char('o') | KeyCode::Enter => open_current(state),
        _ => {}
    }
    false
}

/// Opens the selected stream's watch page in the system browser.
fn open_current(state: &GridPreviewState) {
    let Some(url) = state.current().and_then(|c| c.watch_url.as_deref()) else {
        return;
    };
    let _ = open::that(url);
}
