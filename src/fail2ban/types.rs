//! Data structures shared by the analysis stages.
//!
//! Records are derived once and never mutated afterwards; geolocation results
//! are kept in separate [`Location`] vectors aligned with the table they
//! describe.

/// A single ban event extracted from the log corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// First 19 characters of the log line (`YYYY-MM-DD HH:MM:SS`)
    pub timestamp: String,
    /// Token following the ban marker
    pub ip: String,
}

/// Attack count for one distinct IP address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpStat {
    pub ip: String,
    pub attack_count: usize,
}

/// Attack count for one /24 subnet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetStat {
    /// Subnet prefix including the trailing dot, e.g. `"192.0.2."`
    pub prefix: String,
    pub attack_count: usize,
    /// First unique IP (in sorted order) that falls in this subnet
    pub representative_ip: String,
}

impl SubnetStat {
    /// Network address as written to the subnet CSV (`a.b.c.0`)
    pub fn network(&self) -> String {
        format!("{}0", self.prefix)
    }

    /// Wildcard label used in summaries (`a.b.c.x`)
    pub fn wildcard(&self) -> String {
        format!("{}x", self.prefix)
    }
}

/// Country and coordinates for one IP. Empty strings mean "unresolved".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub country: String,
    pub lat: String,
    pub lon: String,
}

/// Geolocation result for one unique IP, as returned by the lookup service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    /// IP echoed back by the service (empty when the service reported `null`)
    pub ip: String,
    pub location: Location,
}

/// One row of a country histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryTally {
    pub country: String,
    pub count: usize,
    pub percentage: f64,
}
