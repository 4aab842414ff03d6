//! Fail2ban log analysis.
//!
//! Loads the newest rotated fail2ban logs from a directory, extracts every
//! ban event and writes event, unique-IP and /24 subnet tables, a run
//! summary and an attacks-per-day chart. Unless geolocation is disabled, the
//! unique IPs are then located (live through ipinfo, or from a previously
//! captured raw response file), the three tables are rewritten with
//! `Country,Latitude,Longitude` columns and per-country breakdowns are added.
//!
//! # Usage
//!
//! ```bash
//! # All logs in /var/log/, live lookup
//! fail2ban-analyse analyse
//!
//! # Newest 4 logs, no geolocation
//! fail2ban-analyse analyse /var/log/ 4 nolookup
//!
//! # Replay a raw lookup file from an earlier run
//! fail2ban-analyse analyse /var/log/ all 20200118_fail2ban_raw_attacker_info.txt
//! ```
//!
//! # Output
//!
//! Every file is written to `--output-dir` and named
//! `YYYYMMDD_fail2ban<suffix>`; reruns on the same day overwrite them.
//! A geolocation failure stops the run after the first-pass outputs, leaving
//! the tables without location columns.

use crate::error::AnalysisError;
use crate::fail2ban::loader::load_logs;
use crate::fail2ban::parser::extract_events;
use crate::geo::ipinfo::{lookup_all, IpInfoClient};
use crate::geo::merge::enrich;
use crate::geo::raw::{parse_raw_file, warn_rate_limited};
use crate::report::chart::BarChart;
use crate::report::paths::OutputPaths;
use crate::report::summary::{RunOverview, SummaryFile};
use crate::report::tables::{
    write_country_histogram, write_events, write_subnets, write_unique_ips,
};
use crate::stats::aggregate::{
    format_top_ips, format_top_subnets, top_ips, top_subnets, unique_ips, unique_subnets, TOP_N,
};
use crate::stats::daily::attacks_per_day;
use crate::stats::histogram::{CountryHistogram, Granularity};
use crate::stats::usernames::username_line;
use crate::utils::format::format_number;
use crate::utils::time::{day_key, format_clock};
use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Log directory used when none is given or the given one does not exist
pub const DEFAULT_LOG_DIR: &str = "/var/log/";

/// Literal `GEO_SOURCE` value that disables geolocation
pub const NO_LOOKUP: &str = "nolookup";

/// Where geolocation data comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoSource {
    /// Query the lookup service for every unique IP
    Live,
    /// Stop after the first-pass outputs
    Disabled,
    /// Replay a raw response file
    File(PathBuf),
}

impl GeoSource {
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None => Self::Live,
            Some(NO_LOOKUP) => Self::Disabled,
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyseOptions {
    pub directory: Option<String>,
    /// `None` processes every available log
    pub num_logs: Option<usize>,
    pub geo_source: GeoSource,
    pub output_dir: PathBuf,
    pub usernames: PathBuf,
    pub lookup_url: Option<String>,
    pub lookup_token: Option<String>,
}

/// Parses the `NUM_LOGS` argument. Anything that is not a plain
/// non-negative integer (such as `all`) selects every log.
pub fn parse_num_logs(arg: Option<&str>) -> Option<usize> {
    let arg = arg?;
    if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    arg.parse().ok()
}

/// The requested log directory, or the default one if it does not exist.
pub fn resolve_log_dir(directory: Option<&str>) -> PathBuf {
    match directory {
        Some(dir) if Path::new(dir).is_dir() => PathBuf::from(dir),
        Some(dir) => {
            eprintln!(
                "[WARN] Directory {} does not exist, using default {}",
                dir, DEFAULT_LOG_DIR
            );
            PathBuf::from(DEFAULT_LOG_DIR)
        }
        None => {
            eprintln!("No directory specified, using default {}", DEFAULT_LOG_DIR);
            PathBuf::from(DEFAULT_LOG_DIR)
        }
    }
}

pub async fn run(options: &AnalyseOptions) -> Result<()> {
    let started = Instant::now();
    let run_time = Utc::now();
    eprintln!("{}: Starting fail2ban log analysis", format_clock(&run_time));

    if !options.output_dir.is_dir() {
        return Err(AnalysisError::OutputDirMissing {
            path: options.output_dir.display().to_string(),
        }
        .into());
    }
    // Fail before anything is written if the replay file is missing
    if let GeoSource::File(path) = &options.geo_source {
        if !path.is_file() {
            return Err(AnalysisError::GeoFileMissing {
                path: path.display().to_string(),
            }
            .into());
        }
    }

    let log_dir = resolve_log_dir(options.directory.as_deref());
    let paths = OutputPaths::new(&options.output_dir, &run_time);

    let corpus = load_logs(&log_dir, options.num_logs)?;
    let logs_processed = corpus.files.len() - corpus.skipped;
    fs::write(paths.raw_logs(), &corpus.text).with_context(|| {
        format!("Failed to write raw logs: {}", paths.raw_logs().display())
    })?;

    let events = extract_events(&corpus.text);
    let (first, last) = match (events.first(), events.last()) {
        (Some(first), Some(last)) => (first.timestamp.clone(), last.timestamp.clone()),
        _ => {
            eprintln!("[WARN] No attacks found in the selected logs - nothing to analyse");
            return Ok(());
        }
    };

    let unique = unique_ips(&events);
    let subnets = unique_subnets(&events, &unique);
    eprintln!(
        "Found {} attacks from {} unique IPs in {} subnets",
        format_number(events.len()),
        format_number(unique.len()),
        format_number(subnets.len())
    );
    eprintln!("First attack: {}", first);
    eprintln!("Last attack:  {}", last);

    write_events(&paths.all_events(), &events, None)?;
    write_unique_ips(&paths.unique_ips(), &unique, None)?;
    write_subnets(&paths.unique_subnets(), &subnets, None)?;

    let top_ip_line = format_top_ips(&top_ips(&unique, TOP_N));
    let top_subnet_line = format_top_subnets(&top_subnets(&subnets, TOP_N));
    eprintln!("Top {} offenders (IP): {}", TOP_N, top_ip_line);
    eprintln!("Top {} subnets (/24): {}", TOP_N, top_subnet_line);

    let usernames = username_line(&options.usernames);

    let overview = RunOverview {
        run_time,
        logs_processed,
        total_attacks: events.len(),
        unique_ips: unique.len(),
        unique_subnets: subnets.len(),
        first_attack: first.clone(),
        last_attack: last.clone(),
        top_ips: top_ip_line.clone(),
        top_subnets: top_subnet_line.clone(),
        usernames: usernames.clone(),
    };
    let summary = SummaryFile::create(&paths.summary(), &overview)?;

    let mut title = vec![
        format!(
            "Total {} attacks from {} unique IPs",
            events.len(),
            unique.len()
        ),
        format!("Top {} offenders (IP): {}", TOP_N, top_ip_line),
        format!("Top {} subnets (/24): {}", TOP_N, top_subnet_line),
    ];
    if !usernames.is_empty() {
        title.push(usernames);
    }
    BarChart::attacks_per_day(&attacks_per_day(&events), title).save(&paths.daily_chart())?;

    let (raw_path, already_warned) = match &options.geo_source {
        GeoSource::Disabled => {
            eprintln!("Geolocation disabled - skipping country analysis");
            eprintln!(
                "{}: Completed fail2ban log analysis",
                format_clock(&Utc::now())
            );
            return Ok(());
        }
        GeoSource::File(path) => {
            eprintln!("Reading attacker info from {}", path.display());
            (path.clone(), false)
        }
        GeoSource::Live => {
            let client = IpInfoClient::from_options(
                options.lookup_url.as_deref(),
                options.lookup_token.as_deref(),
            )?;
            eprintln!(
                "Looking up {} unique IPs at {}",
                format_number(unique.len()),
                client.base_url()
            );
            let raw_path = paths.raw_attacker_info();
            let report = lookup_all(&client, &unique, &raw_path).await?;
            (raw_path, report.rate_limited)
        }
    };

    let table = parse_raw_file(&raw_path)?;
    if table.rate_limited && !already_warned {
        warn_rate_limited();
    }
    table.report(unique.len());
    let geo = table.into_geo_infos(unique.len())?;

    let enrichment = enrich(&events, &unique, &subnets, &geo);
    write_events(&paths.all_events(), &events, Some(&enrichment.events))?;
    write_unique_ips(&paths.unique_ips(), &unique, Some(&enrichment.ips))?;
    write_subnets(&paths.unique_subnets(), &subnets, Some(&enrichment.subnets))?;

    let histograms = Granularity::ALL
        .map(|granularity| CountryHistogram::build(granularity, enrichment.countries(granularity)));
    for histogram in &histograms {
        write_country_histogram(&paths.country_table(histogram.granularity), histogram)?;
    }

    eprintln!(
        "Attacks came from {} countries: {}",
        histograms[0].tallies.len(),
        histograms[0].format_top(TOP_N)
    );
    summary.append_countries(&histograms[0], started.elapsed())?;

    for histogram in &histograms {
        BarChart::country_distribution(histogram, day_key(&first), day_key(&last))
            .save(&paths.country_chart(histogram.granularity))?;
    }

    eprintln!(
        "{}: Completed fail2ban log analysis, results in {}",
        format_clock(&Utc::now()),
        options.output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_source_from_arg() {
        assert_eq!(GeoSource::from_arg(None), GeoSource::Live);
        assert_eq!(GeoSource::from_arg(Some("nolookup")), GeoSource::Disabled);
        assert_eq!(
            GeoSource::from_arg(Some("raw.txt")),
            GeoSource::File(PathBuf::from("raw.txt"))
        );
    }

    #[test]
    fn test_parse_num_logs() {
        assert_eq!(parse_num_logs(Some("4")), Some(4));
        assert_eq!(parse_num_logs(Some("0")), Some(0));
        assert_eq!(parse_num_logs(Some("all")), None);
        assert_eq!(parse_num_logs(Some("-1")), None);
        assert_eq!(parse_num_logs(None), None);
    }

    #[test]
    fn test_missing_dir_falls_back_to_default() {
        assert_eq!(
            resolve_log_dir(Some("/definitely/not/a/dir")),
            PathBuf::from(DEFAULT_LOG_DIR)
        );
        let dir = tempfile::TempDir::new().unwrap();
        let given = dir.path().to_str().unwrap();
        assert_eq!(resolve_log_dir(Some(given)), PathBuf::from(given));
    }
}
