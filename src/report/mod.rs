//! Output writers.
//!
//! - [`tables`] - CSV tables (events, unique IPs, subnets, country breakdowns)
//! - [`summary`] - Human-readable run summary, written in two passes
//! - [`chart`] - SVG bar charts
//! - [`geojson`] - GeoJSON feature collection for map overlays
//! - [`paths`] - Date-stamped output file names

pub mod chart;
pub mod geojson;
pub mod paths;
pub mod summary;
pub mod tables;
