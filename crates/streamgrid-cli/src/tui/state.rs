//! Grid preview state management.

use streamgrid_core::StreamCell;
use streamgrid_core::YouTubeEmbed;

/// A cell as shown in the terminal preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewCell {
    /// Cell key (stream id).
    pub key: String,
    /// Heading line.
    pub heading: String,
    /// Description line.
    pub text: String,
    /// Embed source URL.
    pub embed_src: String,
    /// Watch page URL opened with `o`.
    pub watch_url: Option<String>,
}

impl From<&StreamCell> for PreviewCell {
    fn from(cell: &StreamCell) -> Self {
        Self {
            key: cell.key.clone(),
            heading: cell.heading.clone(),
            text: cell.text.clone(),
            embed_src: String::from(cell.player.src.as_str()),
            watch_url: YouTubeEmbed::watch_url(&cell.key).ok().map(String::from),
        }
    }
}

/// State for the grid preview TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct GridPreviewState {
    /// Cells in grid order.
    pub cells: Vec<PreviewCell>,
    /// Grid column count (at least 1).
    columns: usize,
    /// Index of the selected cell.
    cursor: usize,
    /// First visible row.
    first_row: usize,
}

impl GridPreviewState {
    /// Creates a new state. A `columns` of zero is treated as one.
    #[must_use]
    pub fn new(cells: Vec<PreviewCell>, columns: usize) -> Self {
        Self {
            cells,
            columns: columns.max(1),
            cursor: 0,
            first_row: 0,
        }
    }

    /// Grid column count.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Index of the selected cell.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// First visible row.
    #[must_use]
    pub const fn first_row(&self) -> usize {
        self.first_row
    }

    /// Total rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.cells.len().div_ceil(self.columns)
    }

    /// Row of the selected cell.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn cursor_row(&self) -> usize {
        self.cursor / self.columns
    }

    /// Column of the selected cell.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn cursor_column(&self) -> usize {
        self.cursor % self.columns
    }

    /// The selected cell, if any.
    #[must_use]
    pub fn current(&self) -> Option<&PreviewCell> {
        self.cells.get(self.cursor)
    }

    /// Moves one cell left within the row.
    pub const fn move_left(&mut self) {
        if self.cursor_column() > 0 {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    /// Moves one cell right within the row.
    pub fn move_right(&mut self) {
        let next = self.cursor.saturating_add(1);
        if self.cursor_column().saturating_add(1) < self.columns && next < self.cells.len() {
            self.cursor = next;
        }
    }

    /// Moves one row up.
    pub const fn move_up(&mut self) {
        if self.cursor >= self.columns {
            self.cursor = self.cursor.saturating_sub(self.columns);
        }
    }

    /// Moves one row down, landing on the last cell if the row below is short.
    pub fn move_down(&mut self) {
        if self.cursor_row().saturating_add(1) >= self.rows() {
            return;
        }
        let below = self.cursor.saturating_add(self.columns);
        self.cursor = below.min(self.cells.len().saturating_sub(1));
    }

    /// Scrolls so the selected row is within `visible_rows` rows.
    pub fn ensure_visible(&mut self, visible_rows: usize) {
        let visible_rows = visible_rows.max(1);
        let row = self.cursor_row();
        if row < self.first_row {
            self.first_row = row;
        } else if row >= self.first_row.saturating_add(visible_rows) {
            self.first_row = row.saturating_sub(visible_rows.saturating_sub(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_state(count: usize, columns: usize) -> GridPreviewState {
        let cells = (0..count)
            .map(|i| PreviewCell {
                key: format!("id{i}"),
                heading: format!("Title {i}"),
                text: String::new(),
                embed_src: String::new(),
                watch_url: None,
            })
            .collect();
        GridPreviewState::new(cells, columns)
    }

    #[test]
    fn test_initial_state() {
        // Arrange & Act
        let state = make_state(5, 2);

        // Assert
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.rows(), 3);
        assert_eq!(state.current().map(|c| c.key.as_str()), Some("id0"));
    }

    #[test]
    fn test_zero_columns_treated_as_one() {
        let state = make_state(3, 0);
        assert_eq!(state.columns(), 1);
        assert_eq!(state.rows(), 3);
    }

    #[test]
    fn test_empty_grid_has_no_current() {
        // Arrange
        let mut state = make_state(0, 3);

        // Act
        state.move_right();
        state.move_down();

        // Assert
        assert!(state.current().is_none());
        assert_eq!(state.rows(), 0);
    }

    #[test]
    fn test_move_right_stops_at_row_end() {
        // Arrange
        let mut state = make_state(6, 3);

        // Act
        state.move_right();
        state.move_right();
        state.move_right();

        // Assert
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn test_move_left_stops_at_row_start() {
        // Arrange
        let mut state = make_state(6, 3);
        state.move_down();

        // Act
        state.move_left();

        // Assert
        assert_eq!(state.cursor(), 3);
    }

    #[test]
    fn test_move_down_up() {
        // Arrange
        let mut state = make_state(7, 3);

        // Act & Assert
        state.move_down();
        assert_eq!(state.cursor(), 3);
        state.move_down();
        assert_eq!(state.cursor(), 6);
        state.move_down();
        assert_eq!(state.cursor(), 6);
        state.move_up();
        assert_eq!(state.cursor(), 3);
        state.move_up();
        state.move_up();
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_move_down_into_short_row() {
        // Arrange
        let mut state = make_state(4, 3);
        state.move_right();
        state.move_right();

        // Act
        state.move_down();

        // Assert
        assert_eq!(state.cursor(), 3);
    }

    #[test]
    fn test_move_right_in_short_row() {
        // Arrange
        let mut state = make_state(4, 3);
        state.move_down();

        // Act
        state.move_right();

        // Assert
        assert_eq!(state.cursor(), 3);
    }

    #[test]
    fn test_ensure_visible_scrolls() {
        // Arrange
        let mut state = make_state(12, 2);
        for _ in 0..4 {
            state.move_down();
        }

        // Act
        state.ensure_visible(2);

        // Assert
        assert_eq!(state.cursor_row(), 4);
        assert_eq!(state.first_row(), 3);

        // Act - back to the top
        for _ in 0..4 {
            state.move_up();
        }
        state.ensure_visible(2);

        // Assert
        assert_eq!(state.first_row(), 0);
    }
}
