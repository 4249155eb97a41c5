//! Playback options shared by every embedded player.
//!
//! The option set is fixed: there is no builder and no setter, and
//! [`PlaybackOptions::fixed`] is the only way to obtain a value.

use std::fmt;

/// A player dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Percentage of the containing cell.
    Percent(u8),
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// Display and playback options handed to the embedded player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct PlaybackOptions {
    width: Dimension,
    height: Dimension,
    autoplay: bool,
    mute: bool,
    controls: bool,
    modest_branding: bool,
    related: bool,
    show_info: bool,
    looped: bool,
}

/// Boolean flag as a provider query value.
const fn flag(on: bool) -> &'static str {
    if on { "1" } else { "0" }
}

impl PlaybackOptions {
    /// The one option set used for every cell: fill the cell, autoplay
    /// muted, no controls, minimal branding, no related videos, loop.
    #[must_use]
    pub const fn fixed() -> Self {
        Self {
            width: Dimension::Percent(100),
            height: Dimension::Percent(100),
            autoplay: true,
            mute: true,
            controls: false,
            modest_branding: true,
            related: false,
            show_info: false,
            looped: true,
        }
    }

    /// Player width.
    #[must_use]
    pub const fn width(&self) -> Dimension {
        self.width
    }

    /// Player height.
    #[must_use]
    pub const fn height(&self) -> Dimension {
        self.height
    }

    /// Playback starts without user action.
    #[must_use]
    pub const fn autoplay(&self) -> bool {
        self.autoplay
    }

    /// Audio is muted by default.
    #[must_use]
    pub const fn mute(&self) -> bool {
        self.mute
    }

    /// Playback controls are shown.
    #[must_use]
    pub const fn controls(&self) -> bool {
        self.controls
    }

    /// Provider branding is minimised.
    #[must_use]
    pub const fn modest_branding(&self) -> bool {
        self.modest_branding
    }

    /// Related-content suggestions are shown at the end.
    #[must_use]
    pub const fn related(&self) -> bool {
        self.related
    }

    /// Playback restarts on completion.
    #[must_use]
    pub const fn looped(&self) -> bool {
        self.looped
    }

    /// Provider query parameters, in a stable order.
    #[must_use]
    pub const fn player_vars(&self) -> [(&'static str, &'static str); 7] {
        [
            ("autoplay", flag(self.autoplay)),
            ("mute", flag(self.mute)),
            ("controls", flag(self.controls)),
            ("modestbranding", flag(self.modest_branding)),
            ("rel", flag(self.related)),
            ("showinfo", flag(self.show_info)),
            ("loop", flag(self.looped)),
        ]
    }
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self::fixed()
    }
}
