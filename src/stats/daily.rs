//! Attacks per calendar day.
//!
//! Events are counted in runs: consecutive events on the same day form one
//! bar and a change of day starts the next one. With chronologically ordered
//! input this is one bar per day.

use crate::fail2ban::types::LogRecord;
use crate::utils::time::parse_day;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub attacks: usize,
}

/// Groups events into per-day counts. Events with an unparsable date are
/// skipped with a warning.
pub fn attacks_per_day(events: &[LogRecord]) -> Vec<DailyCount> {
    let mut days: Vec<DailyCount> = Vec::new();
    let mut skipped = 0;

    for event in events {
        let day = match parse_day(&event.timestamp) {
            Ok(day) => day,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        match days.last_mut() {
            Some(current) if current.day == day => current.attacks += 1,
            _ => days.push(DailyCount { day, attacks: 1 }),
        }
    }

    if skipped > 0 {
        eprintln!(
            "[WARN] Skipped {} events with unrecognised timestamps in daily counts",
            skipped
        );
    }
    days
}
