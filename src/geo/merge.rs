//! Joins geolocation results onto the analysis tables.
//!
//! Results arrive aligned with the sorted unique-IP table. Subnets take the
//! location of their representative IP and events the location of their IP,
//! both found by position in the unique-IP table. Every output vector is
//! aligned with the table it describes.

use crate::fail2ban::types::{GeoInfo, IpStat, Location, LogRecord, SubnetStat};
use crate::stats::histogram::Granularity;
use std::collections::HashMap;

/// Locations aligned with the unique-IP, subnet and event tables
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub ips: Vec<Location>,
    pub subnets: Vec<Location>,
    pub events: Vec<Location>,
}

impl Enrichment {
    /// Countries of the table a histogram at `granularity` is built over
    pub fn countries(&self, granularity: Granularity) -> impl Iterator<Item = &str> {
        let locations = match granularity {
            Granularity::Events => &self.events,
            Granularity::UniqueIps => &self.ips,
            Granularity::UniqueSubnets => &self.subnets,
        };
        locations.iter().map(|l| l.country.as_str())
    }
}

/// Position of each IP in the unique-IP table
fn position_index(unique: &[IpStat]) -> HashMap<&str, usize> {
    unique
        .iter()
        .enumerate()
        .map(|(i, stat)| (stat.ip.as_str(), i))
        .collect()
}

/// Locations for the unique-IP table, warning where the echoed IP differs.
pub fn locate_unique_ips(unique: &[IpStat], geo: &[GeoInfo]) -> Vec<Location> {
    unique
        .iter()
        .zip(geo)
        .map(|(stat, info)| {
            if stat.ip != info.ip {
                eprintln!(
                    "[WARN] Mismatch between IP query and result tables: queried {}, result {}",
                    stat.ip, info.ip
                );
            }
            info.location.clone()
        })
        .collect()
}

fn lookup<'a>(
    index: &HashMap<&str, usize>,
    geo: &'a [GeoInfo],
    ip: &str,
    misses: &mut usize,
) -> Option<&'a Location> {
    let location = index.get(ip).and_then(|&i| geo.get(i)).map(|g| &g.location);
    if location.is_none() {
        *misses += 1;
    }
    location
}

fn warn_misses(table: &str, misses: usize) {
    if misses > 0 {
        eprintln!(
            "[WARN] {} {} rows have no matching unique IP - left without location",
            misses, table
        );
    }
}

/// Locations for the subnet table, from each subnet's representative IP.
pub fn locate_subnets(
    subnets: &[SubnetStat],
    unique: &[IpStat],
    geo: &[GeoInfo],
) -> Vec<Location> {
    let index = position_index(unique);
    let mut misses = 0;
    let located = subnets
        .iter()
        .map(|s| {
            lookup(&index, geo, &s.representative_ip, &mut misses)
                .cloned()
                .unwrap_or_default()
        })
        .collect();
    warn_misses("subnet", misses);
    located
}

/// Locations for every ban event.
pub fn locate_events(events: &[LogRecord], unique: &[IpStat], geo: &[GeoInfo]) -> Vec<Location> {
    let index = position_index(unique);
    let mut misses = 0;
    let located = events
        .iter()
        .map(|e| {
            lookup(&index, geo, &e.ip, &mut misses)
                .cloned()
                .unwrap_or_default()
        })
        .collect();
    warn_misses("event", misses);
    located
}

/// Joins `geo` (aligned with `unique`) onto all three tables.
pub fn enrich(
    events: &[LogRecord],
    unique: &[IpStat],
    subnets: &[SubnetStat],
    geo: &[GeoInfo],
) -> Enrichment {
    Enrichment {
        ips: locate_unique_ips(unique, geo),
        subnets: locate_subnets(subnets, unique, geo),
        events: locate_events(events, unique, geo),
    }
}
