//! Earthquake feed from the Icelandic Met Office.
//!
//! The Met Office publishes recent quakes as a JavaScript array
//! (`VI.quakeInfo`) inside an HTML page. [`parse_quake_page`] turns that
//! array into [`Quake`] rows, [`write_csv`] exports them and
//! [`QuakeSummary`] condenses them for the log.

mod client;
mod parse;
mod report;

use chrono::NaiveDateTime;

pub use client::{DEFAULT_QUAKES_URL, QuakeClient, QuakeClientBuilder};
pub use parse::parse_quake_page;
pub use report::{QuakeSummary, write_csv};

/// One earthquake from the `VI.quakeInfo` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Quake {
    /// Origin time as published (Icelandic time, which is UTC).
    pub timestamp: NaiveDateTime,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Depth in kilometres.
    pub depth_km: f64,
    /// Magnitude.
    pub magnitude: f64,
    /// Nearest named place (`dR`).
    pub location: Option<String>,
    /// Compass direction from that place (`dD`).
    pub direction: Option<String>,
    /// Distance from that place in km (`dL`).
    pub distance: Option<f64>,
    /// Location quality (`q`).
    pub quality: Option<f64>,
    /// Hours since the quake (`a`).
    pub age_hours: Option<f64>,
}

/// Trimmed copy of a Met Office earthquake page.
#[cfg(test)]
pub(crate) const SAMPLE_PAGE: &str = r"<!DOCTYPE html>
<html>
<head>
<script type='text/javascript'>
VI.lang = 'en';
</script>
<script type='text/javascript'>
VI.quakeInfo = [
{'t':new Date(2024,1-1,18,21,13,06),'a':1.5,'lat':63.876,'lon':-22.466,'dep':5.2,'s':0.84,'q':90.01,'dL':3.4,'dD':'NNV','dR':'Grindavík'},
{'t':new Date(2024,1-1,18,22,01,45),'a':'0.7','lat':'63.912','lon':'-22.301','dep':'3.1','s':'1.92','q':'75.5','dL':'2.1','dD':'A','dR':'Fagradalsfjall'},
{'t':new Date(2024,1-1,18,20,40,12),'a':2.1,'lat':63.881,'lon':-22.472,'dep':4.0,'s':1.2,'q':88.0,'dL':3.0,'dD':'N','dR':'Grindavík'}
];
VI.quakeCount = 3;
</script>
</head>
<body></body>
</html>
";
