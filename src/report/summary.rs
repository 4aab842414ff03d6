//! Run summary text file.
//!
//! The summary is written in two passes: [`SummaryFile::create`] records
//! everything known before geolocation, and
//! [`SummaryFile::append_countries`] adds the country section afterwards.
//! A run that stops before geolocation leaves a valid first-pass summary.

use crate::stats::aggregate::TOP_N;
use crate::stats::histogram::CountryHistogram;
use crate::utils::time::format_elapsed;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything the first pass reports
#[derive(Debug, Clone)]
pub struct RunOverview {
    pub run_time: DateTime<Utc>,
    pub logs_processed: usize,
    pub total_attacks: usize,
    pub unique_ips: usize,
    pub unique_subnets: usize,
    pub first_attack: String,
    pub last_attack: String,
    pub top_ips: String,
    pub top_subnets: String,
    /// `Top users: ...` line, empty when no usernames file was available
    pub usernames: String,
}

impl RunOverview {
    pub fn render(&self) -> String {
        let mut text = String::new();
        text.push_str(&format!(
            "FAIL2BAN log analysis carried out on {}\n\n",
            self.run_time.format("%Y-%m-%d")
        ));
        text.push_str(&format!("Log files processed: {}\n", self.logs_processed));
        text.push_str(&format!("Total Attacks: {}\n", self.total_attacks));
        text.push_str(&format!("Unique IPs: {}\n", self.unique_ips));
        text.push_str(&format!("Unique Subnets (/24): {}\n", self.unique_subnets));
        text.push_str(&format!("First Attack: {}\n", self.first_attack));
        text.push_str(&format!("Last Attack: {}\n\n", self.last_attack));
        text.push_str(&format!("Top {} offenders (IP): {}\n", TOP_N, self.top_ips));
        text.push_str(&format!("Top {} subnets (/24): {}\n", TOP_N, self.top_subnets));
        text.push_str(&format!("{}\n", self.usernames));
        text
    }
}

/// Country section appended by the second pass
pub fn render_country_section(histogram: &CountryHistogram, elapsed: Duration) -> String {
    format!(
        "Attacks total number of countries: {}\n\
         Top {} countries for most attacks:  {}\n\
         Analysis took {} seconds\n",
        histogram.tallies.len(),
        TOP_N,
        histogram.format_top(TOP_N),
        format_elapsed(elapsed)
    )
}

/// Handle on a summary file that has completed its first pass
#[derive(Debug)]
pub struct SummaryFile {
    path: PathBuf,
}

impl SummaryFile {
    /// First pass: create (or overwrite) the summary
    pub fn create(path: &Path, overview: &RunOverview) -> Result<Self> {
        fs::write(path, overview.render())
            .with_context(|| format!("Failed to write summary: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Second pass: append the country section
    pub fn append_countries(&self, histogram: &CountryHistogram, elapsed: Duration) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to reopen summary: {}", self.path.display()))?;
        file.write_all(render_country_section(histogram, elapsed).as_bytes())?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
