//! Unique IP and /24 subnet aggregation.
//!
//! # Ranking
//!
//! Rankings sort entries ascending by count with a stable sort and then read
//! the result backwards. Among entries with equal counts the one that comes
//! *later* in the input therefore ranks higher. Top-N lists take the first N
//! entries of that ranking and simply come out shorter when fewer entries
//! exist.
//!
//! Unique IPs are ordered by plain string comparison, not numerically.

use crate::fail2ban::types::{IpStat, LogRecord, SubnetStat};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Number of entries shown in top-offender lists
pub const TOP_N: usize = 3;

/// Indices of `counts` from highest to lowest count.
///
/// Equal counts keep reverse input order (stable ascending sort, reversed).
pub fn rank_by_count(counts: &[usize]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..counts.len()).collect();
    indices.sort_by_key(|&i| counts[i]);
    indices.reverse();
    indices
}

/// /24 prefix of an IPv4 address, including the trailing dot.
///
/// Addresses without a dot keep the whole string as prefix.
pub fn subnet_prefix(ip: &str) -> String {
    let network = ip.rsplit_once('.').map_or(ip, |(network, _)| network);
    format!("{}.", network)
}

/// Deduplicated, lexicographically sorted IPs with their event counts.
pub fn unique_ips(events: &[LogRecord]) -> Vec<IpStat> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for event in events {
        *counts.entry(event.ip.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(ip, attack_count)| IpStat {
            ip: ip.to_string(),
            attack_count,
        })
        .collect()
}

/// One entry per /24 subnet, in order of first appearance among the sorted
/// unique IPs. Counts cover every event, not just unique IPs.
pub fn unique_subnets(events: &[LogRecord], unique: &[IpStat]) -> Vec<SubnetStat> {
    let mut event_counts: HashMap<String, usize> = HashMap::new();
    for event in events {
        *event_counts.entry(subnet_prefix(&event.ip)).or_insert(0) += 1;
    }

    let mut seen = HashSet::new();
    let mut subnets = Vec::new();
    for stat in unique {
        let prefix = subnet_prefix(&stat.ip);
        if seen.insert(prefix.clone()) {
            subnets.push(SubnetStat {
                attack_count: event_counts.get(&prefix).copied().unwrap_or(0),
                prefix,
                representative_ip: stat.ip.clone(),
            });
        }
    }
    subnets
}

/// The `n` IPs with the most attacks.
pub fn top_ips(stats: &[IpStat], n: usize) -> Vec<&IpStat> {
    let counts: Vec<usize> = stats.iter().map(|s| s.attack_count).collect();
    rank_by_count(&counts)
        .into_iter()
        .take(n)
        .map(|i| &stats[i])
        .collect()
}

/// The `n` subnets with the most attacks.
pub fn top_subnets(subnets: &[SubnetStat], n: usize) -> Vec<&SubnetStat> {
    let counts: Vec<usize> = subnets.iter().map(|s| s.attack_count).collect();
    rank_by_count(&counts)
        .into_iter()
        .take(n)
        .map(|i| &subnets[i])
        .collect()
}

fn format_ranking(entries: impl Iterator<Item = (String, usize)>) -> String {
    entries
        .enumerate()
        .map(|(i, (label, count))| format!("{}-{} ({})", i + 1, label, count))
        .collect::<Vec<_>>()
        .join("; ")
}

/// `1-192.0.2.1 (12); 2-198.51.100.7 (9); ...`
pub fn format_top_ips(top: &[&IpStat]) -> String {
    format_ranking(top.iter().map(|s| (s.ip.clone(), s.attack_count)))
}

/// `1-192.0.2.x (14); 2-...`
pub fn format_top_subnets(top: &[&SubnetStat]) -> String {
    format_ranking(top.iter().map(|s| (s.wildcard(), s.attack_count)))
}
