//! Grid renderer.
//!
//! Maps the ordered stream records to stream cells laid out row-major in a
//! fixed number of columns. The renderer keeps no state of its own, so
//! rendering the same config twice yields equal output.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use anyhow::{Context, Result, ensure};

use crate::options::PlaybackOptions;
use crate::player::{EmbedPlayer, PlayerSurface};
use crate::record::{StreamConfig, StreamRecord};

/// Default number of grid columns.
pub const DEFAULT_COLUMNS: usize = 3;

/// Largest supported number of grid columns.
pub const MAX_COLUMNS: usize = 64;

/// Column count of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct GridLayout {
    columns: NonZeroUsize,
}

impl GridLayout {
    /// Creates a layout with `columns` columns.
    ///
    /// # Errors
    ///
    /// Returns an error if `columns` is zero or above [`MAX_COLUMNS`].
    pub fn new(columns: usize) -> Result<Self> {
        ensure!(
            columns <= MAX_COLUMNS,
            "grid supports at most {MAX_COLUMNS} columns, got {columns}"
        );
        let columns = NonZeroUsize::new(columns).context("grid needs at least one column")?;
        Ok(Self { columns })
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns.get()
    }

    /// Row-major position of the cell at `index`.
    #[must_use]
    pub fn position(&self, index: usize) -> CellPosition {
        CellPosition {
            index,
            row: index / self.columns,
            column: index % self.columns,
        }
    }

    /// Rows needed for `count` cells.
    #[must_use]
    pub const fn rows(&self, count: usize) -> usize {
        count.div_ceil(self.columns.get())
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: NonZeroUsize::MIN.saturating_add(DEFAULT_COLUMNS.saturating_sub(1)),
        }
    }
}

/// Where a cell sits in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    /// Position in the record sequence.
    pub index: usize,
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub column: usize,
}

/// One rendered grid cell: a player plus its two text labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamCell {
    /// Identity of the cell; the record id.
    pub key: String,
    /// Grid position.
    pub position: CellPosition,
    /// Heading text (the record title).
    pub heading: String,
    /// Body text (the record description).
    pub text: String,
    /// Embedded player bound to the record id.
    pub player: PlayerSurface,
}

/// A fully materialised grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGrid {
    layout: GridLayout,
    cells: Vec<StreamCell>,
}

impl RenderedGrid {
    /// Layout used to place the cells.
    #[must_use]
    pub const fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Cells in grid order.
    #[must_use]
    pub fn cells(&self) -> &[StreamCell] {
        &self.cells
    }

    /// Number of occupied rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.layout.rows(self.cells.len())
    }
}

/// Maps a [`StreamConfig`] to stream cells.
///
/// Every player receives [`PlaybackOptions::fixed`]; there is no way to
/// pass other options through the renderer.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct GridRenderer<'a, P> {
    config: &'a StreamConfig,
    player: P,
    layout: GridLayout,
}

impl<'a, P: EmbedPlayer> GridRenderer<'a, P> {
    /// Creates a renderer over `config`.
    #[must_use]
    pub const fn new(config: &'a StreamConfig, player: P, layout: GridLayout) -> Self {
        Self {
            config,
            player,
            layout,
        }
    }

    fn cell(&self, index: usize, record: &StreamRecord) -> StreamCell {
        StreamCell {
            key: String::from(record.id()),
            position: self.layout.position(index),
            heading: String::from(record.title()),
            text: String::from(record.description()),
            player: self.player.render(record.id(), &PlaybackOptions::fixed()),
        }
    }

    /// Lazily yields one cell per record, in record order.
    ///
    /// Each call starts over from the first record, and the iterator can be
    /// cloned to replay it.
    #[must_use]
    pub fn cells(&self) -> impl Iterator<Item = StreamCell> + Clone + '_ {
        self.config
            .streams()
            .iter()
            .enumerate()
            .map(move |(index, record)| self.cell(index, record))
    }

    /// Renders every cell.
    #[must_use]
    pub fn render(&self) -> RenderedGrid {
        RenderedGrid {
            layout: self.layout,
            cells: self.cells().collect(),
        }
    }

    /// Keys shared by more than one record, in order of first appearance.
    ///
    /// Always empty for a validated config.
    #[must_use]
    pub fn duplicate_keys(&self) -> Vec<&'a str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&'a str> = Vec::new();
        for record in self.config.streams() {
            let count = counts.entry(record.id()).or_insert(0);
            if *count == 1 {
                order.push(record.id());
            }
            *count = count.saturating_add(1);
        }
        order
    }
}
