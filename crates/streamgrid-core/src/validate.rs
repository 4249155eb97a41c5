//! Load-time validation of stream records.
//!
//! Every defect is detected before anything is rendered. What happens next
//! depends on the [`ValidationPolicy`]: strict loading rejects the whole
//! file, lenient loading drops the offending records and logs a warning
//! for each defect.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::{RawStreamRecord, StreamConfig, StreamRecord};
use crate::sources::SourceFile;

/// How defective records are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(clippy::module_name_repetitions)]
pub enum ValidationPolicy {
    /// Any defect aborts the load.
    #[default]
    Strict,
    /// Defective records are skipped with a warning.
    Lenient,
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!(
                "unknown validation policy '{other}' (expected 'strict' or 'lenient')"
            )),
        }
    }
}

/// A required record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `id`
    Id,
    /// `title`
    Title,
    /// `description`
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => write!(f, "id"),
            Self::Title => write!(f, "title"),
            Self::Description => write!(f, "description"),
        }
    }
}

/// A single defect found in the sources file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    /// A required field is absent.
    MissingField {
        /// Position in `streams`.
        index: usize,
        /// The absent field.
        field: Field,
    },
    /// `id` is present but empty or whitespace.
    EmptyId {
        /// Position in `streams`.
        index: usize,
    },
    /// `id` has leading or trailing whitespace.
    PaddedId {
        /// Position in `streams`.
        index: usize,
        /// The id as written.
        id: String,
    },
    /// `id` was already used by an earlier accepted record.
    DuplicateId {
        /// Position in `streams`.
        index: usize,
        /// Position of the record that kept the id.
        first_index: usize,
        /// The colliding id.
        id: String,
    },
}

impl ConfigIssue {
    /// Position of the defective record in `streams`.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::MissingField { index, .. }
            | Self::EmptyId { index }
            | Self::PaddedId { index, .. }
            | Self::DuplicateId { index, .. } => *index,
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { index, field } => {
                write!(f, "streams[{index}]: missing required field `{field}`")
            }
            Self::EmptyId { index } => write!(f, "streams[{index}]: `id` must not be empty"),
            Self::PaddedId { index, id } => write!(
                f,
                "streams[{index}]: `id` '{id}' has leading or trailing whitespace"
            ),
            Self::DuplicateId {
                index,
                first_index,
                id,
            } => write!(
                f,
                "streams[{index}]: duplicate id '{id}' (first used by streams[{first_index}])"
            ),
        }
    }
}

/// Strict-policy failure carrying every defect found.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct ValidationError {
    issues: Vec<ConfigIssue>,
}

impl ValidationError {
    /// All defects, in record order.
    #[must_use]
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid stream configuration ({} issue(s))", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Result of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// The accepted records.
    pub config: StreamConfig,
    /// Defects of records dropped under the lenient policy. Always empty
    /// under the strict policy.
    pub skipped: Vec<ConfigIssue>,
}

/// Checks one record for missing fields and an empty id.
fn structural_issues(index: usize, raw: &RawStreamRecord) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    match raw.id.as_deref() {
        None => issues.push(ConfigIssue::MissingField {
            index,
            field: Field::Id,
        }),
        Some(id) if id.trim().is_empty() => issues.push(ConfigIssue::EmptyId { index }),
        Some(id) if id.trim() != id => issues.push(ConfigIssue::PaddedId {
            index,
            id: String::from(id),
        }),
        Some(_) => {}
    }
    if raw.title.is_none() {
        issues.push(ConfigIssue::MissingField {
            index,
            field: Field::Title,
        });
    }
    if raw.description.is_none() {
        issues.push(ConfigIssue::MissingField {
            index,
            field: Field::Description,
        });
    }
    issues
}

/// Validates a parsed sources file and builds the immutable config.
///
/// Duplicate ids are checked against records accepted so far, so the first
/// occurrence of an id always wins.
///
/// # Errors
///
/// Under [`ValidationPolicy::Strict`], returns a [`ValidationError`] listing
/// every defect if any record is malformed or duplicated.
pub fn validate(
    source: SourceFile,
    policy: ValidationPolicy,
) -> Result<LoadReport, ValidationError> {
    let mut accepted: Vec<StreamRecord> = Vec::with_capacity(source.streams.len());
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut issues: Vec<ConfigIssue> = Vec::new();

    for (index, raw) in source.streams.into_iter().enumerate() {
        let found = structural_issues(index, &raw);
        if !found.is_empty() {
            issues.extend(found);
            continue;
        }
        let RawStreamRecord {
            id: Some(id),
            title: Some(title),
            description: Some(description),
        } = raw
        else {
            continue;
        };
        if let Some(&first_index) = first_seen.get(&id) {
            issues.push(ConfigIssue::DuplicateId {
                index,
                first_index,
                id,
            });
            continue;
        }
        first_seen.insert(id.clone(), index);
        accepted.push(StreamRecord::new(id, title, description));
    }

    match policy {
        ValidationPolicy::Strict if !issues.is_empty() => Err(ValidationError { issues }),
        ValidationPolicy::Strict | ValidationPolicy::Lenient => {
            for issue in &issues {
                tracing::warn!("skipping stream record: {issue}");
            }
            Ok(LoadReport {
                config: StreamConfig::new(accepted),
                skipped: issues,
            })
        }
    }
}
