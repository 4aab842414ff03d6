//! Unique-IP CSV to GeoJSON conversion.
//!
//! Converts the located unique-IP table written by `analyse` into a point
//! feature collection for overlaying on a Leaflet map.
//!
//! # Usage
//!
//! ```bash
//! # Write attacks-geojson.js in the current directory
//! fail2ban-analyse convert 20200118_fail2ban_attack_IPs_unique.csv
//!
//! # Explicit output file
//! fail2ban-analyse convert 20200118_fail2ban_attack_IPs_unique.csv /var/www/html/attacks.js
//! ```
//!
//! # Input
//!
//! The CSV header must be exactly
//! `IP address,Number of Attacks,Country,Latitude,Longitude`. Rows whose
//! coordinates are not numbers are skipped with a warning.

use crate::error::AnalysisError;
use crate::report::geojson::{write_geojson, Feature, FeatureCollection, Properties};
use crate::report::tables::UNIQUE_IP_HEADERS;
use crate::utils::format::format_number;
use crate::utils::time::format_clock;
use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::File;
use std::path::Path;

/// Output file used when none is given
pub const DEFAULT_OUTPUT: &str = "attacks-geojson.js";

/// `nan` and `inf` parse as floats but would serialize as `null`
fn parse_coordinate(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// One located row of the unique-IP table
#[derive(Debug, Clone, PartialEq)]
pub struct AttackRow {
    pub ip: String,
    /// Kept as written; it is only displayed
    pub attacks: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl AttackRow {
    fn from_record(record: &csv::StringRecord) -> Option<Self> {
        let lat = parse_coordinate(record.get(3)?)?;
        let lon = parse_coordinate(record.get(4)?)?;
        Some(Self {
            ip: record.get(0)?.to_string(),
            attacks: record.get(1)?.to_string(),
            country: record.get(2)?.to_string(),
            lat,
            lon,
        })
    }

    pub fn to_feature(&self) -> Feature {
        Feature::point(
            self.lon,
            self.lat,
            Properties {
                name: format!("IP: {}", self.ip),
                popup_content: format!(
                    "<b>IP: {}</b><br />{} attacks ({})",
                    self.ip, self.attacks, self.country
                ),
            },
        )
    }
}

/// Reads and validates the unique-IP CSV.
pub fn read_attack_rows(path: &Path) -> Result<Vec<AttackRow>> {
    let file = File::open(path)
        .with_context(|| format!("Cannot read from file (check permissions?): {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = reader.records();
    let expected = UNIQUE_IP_HEADERS.join(", ");
    let header = match records.next() {
        Some(record) => record?.iter().collect::<Vec<_>>().join(", "),
        None => String::new(),
    };
    if header != expected {
        return Err(AnalysisError::InvalidCsvHeader {
            path: path.display().to_string(),
            expected,
        }
        .into());
    }

    let mut rows = Vec::new();
    for record in records {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                eprintln!("[WARN] Ignoring invalid line: {}", e);
                continue;
            }
        };
        match AttackRow::from_record(&record) {
            Some(row) => rows.push(row),
            None => eprintln!(
                "[WARN] Ignoring invalid line: {}",
                record.iter().collect::<Vec<_>>().join(", ")
            ),
        }
    }
    Ok(rows)
}

pub fn build_feature_collection(rows: &[AttackRow]) -> FeatureCollection {
    FeatureCollection::new(rows.iter().map(AttackRow::to_feature).collect())
}

pub fn run(input: &str, output: Option<&str>) -> Result<()> {
    eprintln!(
        "{}: Starting conversion of fail2ban data from CSV to GeoJSON",
        format_clock(&Utc::now())
    );

    let input_path = Path::new(input);
    if !input_path.is_file() {
        return Err(AnalysisError::InputMissing {
            path: input.to_string(),
        }
        .into());
    }

    let output_path = match output {
        Some(out) => {
            let path = Path::new(out);
            if let Some(parent) = path.parent() {
                // An empty parent means the current working directory
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    return Err(AnalysisError::OutputDirMissing {
                        path: parent.display().to_string(),
                    }
                    .into());
                }
            }
            path
        }
        None => {
            eprintln!(
                "[WARN] No output file specified, using default '{}' in current working directory",
                DEFAULT_OUTPUT
            );
            Path::new(DEFAULT_OUTPUT)
        }
    };
    if output_path.is_file() {
        eprintln!(
            "[WARN] Specified output file '{}' already exists, and will be overwritten",
            output_path.display()
        );
    }

    eprintln!("Opening CSV file {} and importing data...", input);
    let rows = read_attack_rows(input_path)?;

    eprintln!(
        "Creating {} GeoJSON features and writing to file {}",
        format_number(rows.len()),
        output_path.display()
    );
    write_geojson(output_path, &build_feature_collection(&rows))?;

    eprintln!(
        "{}: Completed conversion of fail2ban data from CSV to GeoJSON",
        format_clock(&Utc::now())
    );
    Ok(())
}
