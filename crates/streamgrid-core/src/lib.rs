//! Core library for streamgrid.
//!
//! Loads an ordered list of stream records, validates it once, and maps
//! every record to a grid cell holding an embedded video player surface
//! plus its title and description. A second feed, [`quakes`], scrapes
//! recent earthquakes from the Icelandic Met Office into CSV.

/// Grid renderer and cell layout.
pub mod grid;
/// HTML page output.
pub mod html;
/// Fixed playback options handed to every player.
pub mod options;
/// Embedded video player capability.
pub mod player;
/// Icelandic Met Office earthquake feed.
pub mod quakes;
/// Stream record types.
pub mod record;
/// Sources file loading.
pub mod sources;
/// Load-time validation.
pub mod validate;

pub use grid::{GridLayout, GridRenderer, RenderedGrid, StreamCell};
pub use html::HtmlPage;
pub use options::PlaybackOptions;
pub use player::{EmbedPlayer, PlayerSurface, Traced, YouTubeEmbed};
pub use quakes::{Quake, QuakeClient, QuakeSummary, parse_quake_page, write_csv};
pub use record::{RawStreamRecord, StreamConfig, StreamRecord};
pub use sources::{SourceFile, SourceFormat, load_sources, parse_sources};
pub use validate::{ConfigIssue, LoadReport, ValidationError, ValidationPolicy, validate};
