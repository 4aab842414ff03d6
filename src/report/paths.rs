//! Output file naming.
//!
//! Every file of a run shares the stem `YYYYMMDD_fail2ban` (UTC run date) and
//! lands in the output directory. Reruns on the same day overwrite earlier
//! outputs.

use crate::stats::histogram::Granularity;
use crate::utils::time::file_stem;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct OutputPaths {
    dir: PathBuf,
    stem: String,
}

impl OutputPaths {
    pub fn new(dir: &Path, run_time: &DateTime<Utc>) -> Self {
        Self {
            dir: dir.to_path_buf(),
            stem: file_stem(run_time),
        }
    }

    fn file(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{}", self.stem, suffix))
    }

    pub fn raw_logs(&self) -> PathBuf {
        self.file("_all_raw_logs.txt")
    }

    pub fn all_events(&self) -> PathBuf {
        self.file("_attack_IPs_all.csv")
    }

    pub fn unique_ips(&self) -> PathBuf {
        self.file("_attack_IPs_unique.csv")
    }

    pub fn unique_subnets(&self) -> PathBuf {
        self.file("_attack_IPs_unique_subnet.csv")
    }

    pub fn summary(&self) -> PathBuf {
        self.file("_log_analysis_summary.txt")
    }

    pub fn raw_attacker_info(&self) -> PathBuf {
        self.file("_raw_attacker_info.txt")
    }

    pub fn daily_chart(&self) -> PathBuf {
        self.file("_attacks_per_day_bar.svg")
    }

    pub fn country_table(&self, granularity: Granularity) -> PathBuf {
        match granularity {
            Granularity::Events => self.file("_attack_by_country_all_IPs.csv"),
            Granularity::UniqueIps => self.file("_attack_by_country_unique_IPs.csv"),
            Granularity::UniqueSubnets => self.file("_attack_by_country_unique_subnet.csv"),
        }
    }

    pub fn country_chart(&self, granularity: Granularity) -> PathBuf {
        match granularity {
            Granularity::Events => self.file("_country_hist_all.svg"),
            Granularity::UniqueIps => self.file("_country_hist_unique_IP.svg"),
            Granularity::UniqueSubnets => self.file("_country_hist_unique_subnet.svg"),
        }
    }
}
