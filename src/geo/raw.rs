//! Parser for raw ipinfo response files.
//!
//! A raw file is the concatenation of the pretty-printed JSON bodies returned
//! for each unique IP, in unique-IP order:
//!
//! ```text
//! {
//!   "ip": "192.0.2.17",
//!   "country": "US",
//!   "loc": "37.3860,-122.0838"
//! }{
//!   "ip": "10.0.0.1",
//!   "bogon": true
//! }
//! ```
//!
//! Bodies are not parsed as JSON: concatenated bodies are not a JSON document,
//! and rate-limit responses are plain text. Instead each line is matched
//! against the `"ip":`, `"country":` and `"loc":` keys. A field whose line
//! contains `null` resolves to an empty value. Bogon addresses and records
//! carrying nothing but an IP resolve to empty country and coordinates.

use crate::error::AnalysisError;
use crate::fail2ban::types::{GeoInfo, Location};
use crate::utils::reader::read_text;
use anyhow::Result;
use std::path::Path;

/// Text ipinfo returns once the free allowance is used up
pub const RATE_LIMIT_MARKER: &str = "Rate limit exceeded";

/// Operator warning for an exhausted look-up allowance
pub const RATE_LIMIT_WARNING: [&str; 2] = [
    "[WARN] ipinfo look-up allowance exceeded - try tomorrow or subscribe to paid service",
    "       Note max free ipinfo look-ups is limited per day, see ipinfo.io terms of service",
];

/// Prints [`RATE_LIMIT_WARNING`] to stderr.
pub fn warn_rate_limited() {
    for line in RATE_LIMIT_WARNING {
        eprintln!("{}", line);
    }
}

/// Parallel columns collected from a raw response file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GeoTable {
    pub ips: Vec<String>,
    pub countries: Vec<String>,
    pub lats: Vec<String>,
    pub lons: Vec<String>,
    /// Whether a rate-limit message was seen. The parser never warns itself;
    /// callers decide whether the warning was already printed.
    pub rate_limited: bool,
}

fn quoted_value(line: &str) -> String {
    if line.contains("null") {
        return String::new();
    }
    line.split('"').nth(3).unwrap_or("").to_string()
}

fn non_empty(values: &[String]) -> usize {
    values.iter().filter(|v| !v.is_empty()).count()
}

impl GeoTable {
    fn push_unresolved(&mut self) {
        self.countries.push(String::new());
        self.lats.push(String::new());
        self.lons.push(String::new());
    }

    /// Prints how many values of each column were resolved.
    pub fn report(&self, queried: usize) {
        eprintln!(
            "Searched info for {} IPs: found {} IP addresses, {} countries, {} lats and {} lons",
            queried,
            non_empty(&self.ips),
            non_empty(&self.countries),
            non_empty(&self.lats),
            non_empty(&self.lons)
        );
    }

    /// Zips the columns into per-IP results.
    ///
    /// Every column must hold exactly `expected` entries; anything else means
    /// the file does not belong to this IP set or a lookup was lost.
    pub fn into_geo_infos(self, expected: usize) -> Result<Vec<GeoInfo>, AnalysisError> {
        let lengths = [
            self.ips.len(),
            self.countries.len(),
            self.lats.len(),
            self.lons.len(),
        ];
        if lengths.iter().any(|&len| len != expected) {
            return Err(AnalysisError::GeoCountMismatch {
                expected,
                ips: lengths[0],
                countries: lengths[1],
                lats: lengths[2],
                lons: lengths[3],
            });
        }

        Ok(self
            .ips
            .into_iter()
            .zip(self.countries)
            .zip(self.lats.into_iter().zip(self.lons))
            .map(|((ip, country), (lat, lon))| GeoInfo {
                ip,
                location: Location { country, lat, lon },
            })
            .collect())
    }
}

/// Parses raw response text into parallel columns.
pub fn parse_raw_responses(text: &str) -> GeoTable {
    let mut table = GeoTable::default();
    let mut last_line = "";

    for line in text.lines() {
        if line.contains(RATE_LIMIT_MARKER) {
            table.rate_limited = true;
        }

        if line.contains("\"ip\":") {
            table.ips.push(quoted_value(line));
        }
        if line.contains("\"country\":") {
            table.countries.push(quoted_value(line));
        }
        if line.contains("\"loc\":") {
            let loc = quoted_value(line);
            let mut parts = loc.splitn(2, ',');
            table.lats.push(parts.next().unwrap_or("").to_string());
            table.lons.push(parts.next().unwrap_or("").to_string());
        }

        let ip_only_record = last_line.contains("\"ip\":") && line.trim_start().starts_with('}');
        if line.contains("\"bogon\": true") || ip_only_record {
            table.push_unresolved();
        }
        last_line = line;
    }

    table
}

/// Reads and parses a raw response file.
pub fn parse_raw_file(path: &Path) -> Result<GeoTable> {
    if !path.is_file() {
        return Err(AnalysisError::GeoFileMissing {
            path: path.display().to_string(),
        }
        .into());
    }
    let text = read_text(path)?;
    Ok(parse_raw_responses(&text))
}
