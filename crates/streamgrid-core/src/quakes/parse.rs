//! `VI.quakeInfo` extraction.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use regex::{Captures, Regex};
use serde::Deserialize;

use super::Quake;

/// How much of a bad array to quote in a parse error.
const ERROR_PREVIEW_CHARS: usize = 200;

/// Timestamp layout after `new Date(...)` is rewritten.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[allow(clippy::expect_used)]
static QUAKE_INFO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)VI\.quakeInfo\s*=\s*(\[.*?\]);").expect("failed to compile quakeInfo regex")
});

/// `new Date(y,m-1,d,h,mi,s)`; the month is written one-based with `-1`.
#[allow(clippy::expect_used)]
static JS_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"new Date\(\s*(\d+)\s*,\s*(\d+)\s*-\s*1\s*,\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*\)",
    )
    .expect("failed to compile JS date regex")
});

/// A table value that may be written as a number or a quoted string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn to_f64(&self, field: &str) -> Result<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse()
                .with_context(|| format!("`{field}` is not a number: {s:?}")),
        }
    }

    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// One entry of the array, keyed as the page writes it.
#[derive(Debug, Deserialize)]
struct RawQuake {
    t: String,
    lat: Scalar,
    lon: Scalar,
    dep: Scalar,
    s: Scalar,
    #[serde(rename = "dR", default)]
    place: Option<Scalar>,
    #[serde(rename = "dD", default)]
    direction: Option<Scalar>,
    #[serde(rename = "dL", default)]
    distance: Option<Scalar>,
    #[serde(default)]
    q: Option<Scalar>,
    #[serde(default)]
    a: Option<Scalar>,
}

impl RawQuake {
    fn into_quake(self) -> Result<Quake> {
        let timestamp = NaiveDateTime::parse_from_str(&self.t, TIMESTAMP_FORMAT)
            .with_context(|| format!("invalid timestamp {:?}", self.t))?;
        Ok(Quake {
            timestamp,
            latitude: self.lat.to_f64("lat")?,
            longitude: self.lon.to_f64("lon")?,
            depth_km: self.dep.to_f64("dep")?,
            magnitude: self.s.to_f64("s")?,
            location: self.place.map(Scalar::into_text),
            direction: self.direction.map(Scalar::into_text),
            distance: self.distance.map(|v| v.to_f64("dL")).transpose()?,
            quality: self.q.map(|v| v.to_f64("q")).transpose()?,
            age_hours: self.a.map(|v| v.to_f64("a")).transpose()?,
        })
    }
}

/// Rewrites the JavaScript array literal into JSON.
fn js_array_to_json(array: &str) -> String {
    let dated = JS_DATE_RE.replace_all(array, |caps: &Captures<'_>| {
        // Out-of-range parts become 0 and are rejected by the timestamp parse.
        let part = |i: usize| -> u32 {
            caps.get(i)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        };
        format!(
            "\"{:04}-{:02}-{:02}T{:02}:{:02}:{:02}\"",
            part(1),
            part(2),
            part(3),
            part(4),
            part(5),
            part(6)
        )
    });
    dated.replace('\'', "\"")
}

/// Extracts every quake from a Met Office earthquake page.
///
/// # Errors
///
/// Returns an error if the page has no `VI.quakeInfo` array, the array is
/// not valid once converted to JSON, or an entry has a malformed field.
pub fn parse_quake_page(html: &str) -> Result<Vec<Quake>> {
    let array = QUAKE_INFO_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .context("could not find VI.quakeInfo in the page")?
        .as_str();

    let json = js_array_to_json(array);
    let raw: Vec<RawQuake> = serde_json::from_str(&json).with_context(|| {
        let preview: String = json.chars().take(ERROR_PREVIEW_CHARS).collect();
        format!("failed to parse VI.quakeInfo: {preview}...")
    })?;

    let quakes = raw
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .into_quake()
                .with_context(|| format!("VI.quakeInfo[{index}]"))
        })
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!("parsed {} quake(s)", quakes.len());
    Ok(quakes)
}
