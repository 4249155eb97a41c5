//! Stream record types.

use serde::{Deserialize, Serialize};

/// A stream entry as it appears in the sources file.
///
/// Every field is optional so that a record with a missing field can be
/// reported individually instead of failing the whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStreamRecord {
    /// Provider-specific video identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Heading shown under the player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Text shown under the heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RawStreamRecord {
    /// Creates a raw record with all three fields present.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }
}

/// A well-formed stream record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    id: String,
    title: String,
    description: String,
}

impl StreamRecord {
    /// Creates a record. No validation happens here; see [`crate::validate`].
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    /// Provider-specific video identifier. Also the cell key.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display title (may be empty).
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Display description (may be empty).
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// The ordered, immutable collection of stream records.
///
/// Order is grid order. There are no mutating methods: a config is built
/// once at load time and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct StreamConfig {
    streams: Vec<StreamRecord>,
}

impl StreamConfig {
    /// Wraps records as-is, without validation.
    ///
    /// Prefer [`crate::validate::validate`] for anything read from disk.
    #[must_use]
    pub const fn new(streams: Vec<StreamRecord>) -> Self {
        Self { streams }
    }

    /// Records in grid order.
    #[must_use]
    pub fn streams(&self) -> &[StreamRecord] {
        &self.streams
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}
