//! # fail2ban Analysis Tools
//!
//! Command-line tools for turning `fail2ban` ban logs into attack statistics,
//! charts and map overlays.
//!
//! ## Overview
//!
//! Two independent pipelines share one CSV shape:
//!
//! - `analyse` reads a set of rotated `fail2ban.log*` files (plain, `.gz` or
//!   `.zst`), extracts every ban event, aggregates the events per IP, per /24
//!   subnet and per country, and writes CSV tables, a text summary and SVG bar
//!   charts.
//! - `convert` turns the unique-IP CSV produced by `analyse` into a GeoJSON
//!   feature collection ready to be loaded by a web map.
//!
//! ## Architecture
//!
//! - [`fail2ban`] - Log discovery, rotation ordering and ban event extraction
//! - [`stats`] - Unique IP / subnet aggregation, country histograms, daily counts
//! - [`geo`] - ipinfo lookups, raw response parsing and geo joins
//! - [`report`] - CSV tables, summary text, SVG charts and GeoJSON output
//! - [`commands`] - The `analyse` and `convert` command implementations
//! - [`utils`] - Shared utilities (decompression, progress, formatting, time)
//! - [`error`] - Fatal error conditions
//!
//! ## Example Usage
//!
//! ```bash
//! # Analyse every rotated log in /var/log and geolocate via ipinfo.io
//! fail2ban-analyse analyse /var/log
//!
//! # Use the five newest logs and skip geolocation
//! fail2ban-analyse analyse /var/log 5 nolookup
//!
//! # Replay a previously saved ipinfo response file
//! fail2ban-analyse analyse /var/log all 20200118_fail2ban_raw_attacker_info.txt
//!
//! # Build a Leaflet overlay from the unique-IP table
//! fail2ban-analyse convert 20200118_fail2ban_attack_IPs_unique.csv /var/www/html/attacks.js
//! ```

pub mod commands;
pub mod error;
pub mod fail2ban;
pub mod geo;
pub mod report;
pub mod stats;
pub mod utils;
