//! Command implementations for the `fail2ban-analyse` binary.
//!
//! - [`analyse`] - Analyse rotated fail2ban logs, optionally geolocating the
//!   attacking IPs
//! - [`convert`] - Convert a located unique-IP CSV into GeoJSON for map display
//!
//! Each command exposes a `run` function returning `anyhow::Result<()>`;
//! progress and warnings go to stderr.

pub mod analyse;
pub mod convert;
