//! CSV table writers.
//!
//! The event, unique-IP and subnet tables are written twice per run: first
//! without location columns, then rewritten with `Country,Latitude,Longitude`
//! once geolocation has succeeded.

use crate::fail2ban::types::{IpStat, Location, LogRecord, SubnetStat};
use crate::stats::histogram::CountryHistogram;
use crate::utils::format::format_percentage;
use anyhow::{ensure, Context, Result};
use std::fs::File;
use std::path::Path;

/// Columns appended when locations are known
pub const LOCATION_HEADERS: [&str; 3] = ["Country", "Latitude", "Longitude"];

/// Full header of the unique-IP table with locations; the converter's input format
pub const UNIQUE_IP_HEADERS: [&str; 5] = [
    "IP address",
    "Number of Attacks",
    "Country",
    "Latitude",
    "Longitude",
];

fn create_writer(path: &Path) -> Result<csv::Writer<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    Ok(csv::Writer::from_writer(file))
}

/// Writes two key columns per row, plus location columns when given.
fn write_keyed_table<I>(
    path: &Path,
    headers: [&str; 2],
    rows: I,
    row_count: usize,
    locations: Option<&[Location]>,
) -> Result<()>
where
    I: Iterator<Item = [String; 2]>,
{
    if let Some(locations) = locations {
        ensure!(
            locations.len() == row_count,
            "{} locations for {} rows in {}",
            locations.len(),
            row_count,
            path.display()
        );
    }

    let mut writer = create_writer(path)?;
    match locations {
        Some(locations) => {
            writer.write_record(headers.iter().chain(LOCATION_HEADERS.iter()))?;
            for ([key, value], loc) in rows.zip(locations) {
                writer.write_record([
                    key.as_str(),
                    value.as_str(),
                    loc.country.as_str(),
                    loc.lat.as_str(),
                    loc.lon.as_str(),
                ])?;
            }
        }
        None => {
            writer.write_record(headers)?;
            for row in rows {
                writer.write_record(&row)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// `Timestamp,IP address[,Country,Latitude,Longitude]`
pub fn write_events(path: &Path, events: &[LogRecord], locations: Option<&[Location]>) -> Result<()> {
    write_keyed_table(
        path,
        ["Timestamp", "IP address"],
        events.iter().map(|e| [e.timestamp.clone(), e.ip.clone()]),
        events.len(),
        locations,
    )
}

/// `IP address,Number of Attacks[,Country,Latitude,Longitude]`
pub fn write_unique_ips(path: &Path, stats: &[IpStat], locations: Option<&[Location]>) -> Result<()> {
    write_keyed_table(
        path,
        ["IP address", "Number of Attacks"],
        stats
            .iter()
            .map(|s| [s.ip.clone(), s.attack_count.to_string()]),
        stats.len(),
        locations,
    )
}

/// `Subnet (/24),Number of Attacks[,Country,Latitude,Longitude]`
pub fn write_subnets(
    path: &Path,
    subnets: &[SubnetStat],
    locations: Option<&[Location]>,
) -> Result<()> {
    write_keyed_table(
        path,
        ["Subnet (/24)", "Number of Attacks"],
        subnets
            .iter()
            .map(|s| [s.network(), s.attack_count.to_string()]),
        subnets.len(),
        locations,
    )
}

/// `Country,Number of <Attacks|IPs|subnets>,Percentage`, most frequent first
pub fn write_country_histogram(path: &Path, histogram: &CountryHistogram) -> Result<()> {
    let mut writer = create_writer(path)?;
    writer.write_record(["Country", histogram.granularity.count_header(), "Percentage"])?;
    for tally in &histogram.tallies {
        writer.write_record([
            tally.country.as_str(),
            tally.count.to_string().as_str(),
            format_percentage(tally.percentage).as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
