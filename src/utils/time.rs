use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::time::Duration;

/// Length of the `YYYY-MM-DD` prefix of a fail2ban timestamp
const DAY_LEN: usize = 10;

/// Prefix shared by every output file of one run, e.g. `20200118_fail2ban`
pub fn file_stem(now: &DateTime<Utc>) -> String {
    now.format("%Y%m%d_fail2ban").to_string()
}

/// Timestamp used on start/finish status lines
pub fn format_clock(now: &DateTime<Utc>) -> String {
    now.format("%Y-%m-%d_%H:%M:%S").to_string()
}

/// Calendar day portion of a fail2ban timestamp (`YYYY-MM-DD HH:MM:SS`)
pub fn day_key(timestamp: &str) -> &str {
    match timestamp.char_indices().nth(DAY_LEN) {
        Some((idx, _)) => &timestamp[..idx],
        None => timestamp,
    }
}

/// Parse the calendar day of a fail2ban timestamp
pub fn parse_day(timestamp: &str) -> Result<NaiveDate> {
    let day = day_key(timestamp);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .with_context(|| format!("Failed to parse log date: {}", day))
}

/// Elapsed wall time in seconds with one decimal, as written to the summary
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1}", elapsed.as_secs_f64())
}
