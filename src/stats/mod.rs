//! Aggregation of ban events.
//!
//! - [`aggregate`] - Unique IP and /24 subnet tables, rank ordering, top offenders
//! - [`histogram`] - Per-country tallies at event, IP and subnet granularity
//! - [`daily`] - Attacks per calendar day
//! - [`usernames`] - Most common usernames of invalid login attempts

pub mod aggregate;
pub mod daily;
pub mod histogram;
pub mod usernames;
