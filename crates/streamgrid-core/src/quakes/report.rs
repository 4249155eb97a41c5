//! CSV export and summary statistics.

use std::collections::HashMap;
use std::io;

use anyhow::{Context, Result};
use serde::Serialize;

use super::Quake;

/// CSV column names, in column order.
const CSV_HEADER: [&str; 10] = [
    "timestamp",
    "latitude",
    "longitude",
    "depth_km",
    "magnitude",
    "location",
    "direction",
    "distance",
    "quality",
    "age_hours",
];

/// Timestamp layout in the CSV.
const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rows kept in the "most recent" and "most active" lists.
const SUMMARY_TOP: usize = 5;

#[derive(Serialize)]
struct CsvRow<'a> {
    timestamp: String,
    latitude: f64,
    longitude: f64,
    depth_km: f64,
    magnitude: f64,
    location: Option<&'a str>,
    direction: Option<&'a str>,
    distance: Option<f64>,
    quality: Option<f64>,
    age_hours: Option<f64>,
}

impl<'a> From<&'a Quake> for CsvRow<'a> {
    fn from(quake: &'a Quake) -> Self {
        Self {
            timestamp: quake.timestamp.format(CSV_TIMESTAMP_FORMAT).to_string(),
            latitude: quake.latitude,
            longitude: quake.longitude,
            depth_km: quake.depth_km,
            magnitude: quake.magnitude,
            location: quake.location.as_deref(),
            direction: quake.direction.as_deref(),
            distance: quake.distance,
            quality: quake.quality,
            age_hours: quake.age_hours,
        }
    }
}

/// Writes `quakes` as CSV with a header row, in the given order.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_csv<W: io::Write>(quakes: &[Quake], writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(CSV_HEADER)
        .context("failed to write CSV header")?;
    for quake in quakes {
        csv.serialize(CsvRow::from(quake))
            .context("failed to write CSV row")?;
    }
    csv.flush().context("failed to flush CSV output")
}

/// Statistics over a set of quakes.
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeSummary<'a> {
    /// Number of quakes.
    pub count: usize,
    /// Up to five quakes, newest first.
    pub most_recent: Vec<&'a Quake>,
    /// Mean magnitude, `None` when there are no quakes.
    pub mean_magnitude: Option<f64>,
    /// Largest magnitude.
    pub max_magnitude: Option<f64>,
    /// Mean depth in km.
    pub mean_depth_km: Option<f64>,
    /// Up to five places with the most quakes, busiest first.
    pub most_active: Vec<(&'a str, usize)>,
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let count = u32::try_from(values.len()).ok().filter(|&n| n > 0)?;
    Some(values.sum::<f64>() / f64::from(count))
}

impl<'a> QuakeSummary<'a> {
    /// Summarises `quakes`.
    #[must_use]
    pub fn new(quakes: &'a [Quake]) -> Self {
        let mut most_recent: Vec<&Quake> = quakes.iter().collect();
        most_recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        most_recent.truncate(SUMMARY_TOP);

        let mut per_place: HashMap<&str, usize> = HashMap::new();
        for place in quakes.iter().filter_map(|q| q.location.as_deref()) {
            let count = per_place.entry(place).or_insert(0);
            *count = count.saturating_add(1);
        }
        let mut most_active: Vec<(&str, usize)> = per_place.into_iter().collect();
        most_active.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        most_active.truncate(SUMMARY_TOP);

        Self {
            count: quakes.len(),
            most_recent,
            mean_magnitude: mean(quakes.iter().map(|q| q.magnitude)),
            max_magnitude: quakes.iter().map(|q| q.magnitude).reduce(f64::max),
            mean_depth_km: mean(quakes.iter().map(|q| q.depth_km)),
            most_active,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]

    use super::*;
    use crate::quakes::{SAMPLE_PAGE, parse_quake_page};

    #[test]
    fn test_write_csv() {
        // Arrange
        let quakes = parse_quake_page(SAMPLE_PAGE).unwrap();
        let mut out = Vec::new();

        // Act
        write_csv(&quakes, &mut out).unwrap();

        // Assert
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "timestamp,latitude,longitude,depth_km,magnitude,location,direction,distance,quality,age_hours"
        );
        assert!(lines[1].starts_with("2024-01-18 21:13:06,63.876,-22.466,5.2,0.84,Grindavík,NNV,"));
        assert!(lines[2].starts_with("2024-01-18 22:01:45,"));
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let mut out = Vec::new();
        write_csv(&[], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("timestamp,"));
    }

    #[test]
    fn test_summary() {
        // Arrange
        let quakes = parse_quake_page(SAMPLE_PAGE).unwrap();

        // Act
        let summary = QuakeSummary::new(&quakes);

        // Assert
        assert_eq!(summary.count, 3);
        let order: Vec<f64> = summary.most_recent.iter().map(|q| q.magnitude).collect();
        assert_eq!(order, vec![1.92, 0.84, 1.2]);
        assert!((summary.mean_magnitude.unwrap() - 1.32).abs() < 1e-9);
        assert_eq!(summary.max_magnitude, Some(1.92));
        assert!((summary.mean_depth_km.unwrap() - 4.1).abs() < 1e-9);
        assert_eq!(
            summary.most_active,
            vec![("Grindavík", 2), ("Fagradalsfjall", 1)]
        );
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = QuakeSummary::new(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.most_recent.is_empty());
        assert_eq!(summary.mean_magnitude, None);
        assert_eq!(summary.max_magnitude, None);
        assert!(summary.most_active.is_empty());
    }
}
