//! Geolocation of attacking IPs.
//!
//! - [`ipinfo`] - Live lookups against the ipinfo.io API, saved as a raw response file
//! - [`raw`] - Line-oriented parser for raw response files
//! - [`merge`] - Joins geolocation results onto the IP, subnet and event tables
//!
//! A live run and a replay of its raw response file go through the same
//! parser, so both produce identical tables.

pub mod ipinfo;
pub mod merge;
pub mod raw;
