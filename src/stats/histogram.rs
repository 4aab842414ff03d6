//! Country histograms.
//!
//! Countries are tallied in order of first appearance (unresolved lookups
//! count under the empty string) and then ranked with
//! [`rank_by_count`](super::aggregate::rank_by_count), so equal counts list the
//! country that appeared last first.

use super::aggregate::rank_by_count;
use crate::fail2ban::types::CountryTally;
use std::collections::HashMap;

/// Table a histogram is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Every ban event
    Events,
    /// One entry per unique IP
    UniqueIps,
    /// One entry per unique /24 subnet
    UniqueSubnets,
}

impl Granularity {
    /// Every granularity, event histogram first
    pub const ALL: [Granularity; 3] = [Self::Events, Self::UniqueIps, Self::UniqueSubnets];

    /// Count column header of the country CSV
    pub fn count_header(self) -> &'static str {
        match self {
            Self::Events => "Number of Attacks",
            Self::UniqueIps => "Number of IPs",
            Self::UniqueSubnets => "Number of subnets",
        }
    }

    /// Noun used in chart titles
    pub fn noun(self) -> &'static str {
        match self {
            Self::Events => "attacks",
            Self::UniqueIps => "IPs",
            Self::UniqueSubnets => "subnets",
        }
    }

    pub fn chart_title(self) -> &'static str {
        match self {
            Self::Events => "Attacks by country - all attacks",
            Self::UniqueIps => "Attacks by country - unique IP attacks",
            Self::UniqueSubnets => "Attacks by country - unique subnet (/24) attacks",
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            Self::Events => "Proportion of attacks (%)",
            Self::UniqueIps => "Proportion of IP addresses (%)",
            Self::UniqueSubnets => "Proportion of /24 subnets (%)",
        }
    }
}

/// Ranked per-country tallies for one granularity
#[derive(Debug, Clone)]
pub struct CountryHistogram {
    pub granularity: Granularity,
    /// Number of records the tallies were computed over
    pub total: usize,
    /// Tallies from most to least frequent
    pub tallies: Vec<CountryTally>,
}

impl CountryHistogram {
    /// Tallies `countries` (one entry per record of the granularity).
    pub fn build<'a, I>(granularity: Granularity, countries: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut order: Vec<(&str, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut total = 0;

        for country in countries {
            total += 1;
            match index.get(country) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(country, order.len());
                    order.push((country, 1));
                }
            }
        }

        let counts: Vec<usize> = order.iter().map(|(_, count)| *count).collect();
        let tallies = rank_by_count(&counts)
            .into_iter()
            .map(|i| {
                let (country, count) = order[i];
                CountryTally {
                    country: country.to_string(),
                    count,
                    percentage: count as f64 * 100.0 / total as f64,
                }
            })
            .collect();

        Self {
            granularity,
            total,
            tallies,
        }
    }

    /// `1 CN (40); 2 US (12); 3 RU (7)` for the first `n` countries
    pub fn format_top(&self, n: usize) -> String {
        self.tallies
            .iter()
            .take(n)
            .enumerate()
            .map(|(i, t)| format!("{} {} ({})", i + 1, t.country, t.count))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
