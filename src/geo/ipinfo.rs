//! ipinfo.io lookup client.
//!
//! Every unique IP is looked up once, one request at a time and in unique-IP
//! order. Response bodies are written verbatim to the raw attacker info file,
//! which is then parsed by [`parse_raw_file`](super::raw::parse_raw_file).
//!
//! # Configuration
//!
//! - Base URL: `--lookup-url`, then `$IPINFO_URL`, then `https://ipinfo.io`
//! - Token: `--lookup-token`, then `$IPINFO_TOKEN`, otherwise anonymous

use super::raw::{RATE_LIMIT_MARKER, RATE_LIMIT_WARNING};
use crate::fail2ban::types::IpStat;
use crate::utils::progress::ProgressBar;
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const DEFAULT_LOOKUP_URL: &str = "https://ipinfo.io";

/// ipinfo API client configuration
#[derive(Debug, Clone)]
pub struct IpInfoClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl IpInfoClient {
    /// Create a new client for `base_url`
    pub fn new(base_url: String, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("fail2ban-analyse/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            client,
        })
    }

    /// Create a client with optional parameters (for CLI)
    pub fn from_options(lookup_url: Option<&str>, lookup_token: Option<&str>) -> Result<Self> {
        let base_url = lookup_url
            .map(|s| s.to_string())
            .or_else(|| env::var("IPINFO_URL").ok())
            .unwrap_or_else(|| DEFAULT_LOOKUP_URL.to_string());

        let token = lookup_token
            .map(|s| s.to_string())
            .or_else(|| env::var("IPINFO_TOKEN").ok());

        Self::new(base_url, token)
    }

    /// URL of the geolocation endpoint for `ip`
    pub fn geo_url(&self, ip: &str) -> String {
        match &self.token {
            Some(token) => format!("{}/{}/geo?token={}", self.base_url, ip, token),
            None => format!("{}/{}/geo", self.base_url, ip),
        }
    }

    /// Get the configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the raw response body for `ip`.
    ///
    /// Non-success statuses still return the body; a rate-limited response
    /// carries the rate-limit text that the raw parser recognises.
    pub async fn fetch_raw(&self, ip: &str) -> Result<(StatusCode, String)> {
        let response = self
            .client
            .get(self.geo_url(ip))
            .send()
            .await
            .with_context(|| format!("Failed to send lookup request for {}", ip))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        Ok((status, body))
    }
}

fn is_rate_limited(status: StatusCode, body: &str) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || body.contains(RATE_LIMIT_MARKER)
}

/// Outcome of a live look-up pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupReport {
    pub queried: usize,
    pub failed: usize,
    /// Whether the rate-limit warning has already been printed
    pub rate_limited: bool,
}

/// Looks up every unique IP and writes the raw responses to `raw_path`.
///
/// A failed request is reported and skipped; the resulting gap is caught by
/// the count check when the raw file is parsed. The rate-limit warning is
/// printed at most once.
pub async fn lookup_all(
    client: &IpInfoClient,
    ips: &[IpStat],
    raw_path: &Path,
) -> Result<LookupReport> {
    let file = File::create(raw_path)
        .with_context(|| format!("Failed to create raw attacker info file: {}", raw_path.display()))?;
    let mut writer = BufWriter::new(file);

    let progress = ProgressBar::new(ips.len(), "Querying ipinfo");
    let mut report = LookupReport::default();

    for stat in ips {
        report.queried += 1;
        match client.fetch_raw(&stat.ip).await {
            Ok((status, body)) => {
                if is_rate_limited(status, &body) && !report.rate_limited {
                    for line in RATE_LIMIT_WARNING {
                        progress.println(line);
                    }
                    report.rate_limited = true;
                }
                writer.write_all(body.as_bytes())?;
            }
            Err(e) => {
                report.failed += 1;
                progress.println(format!("[WARN] Look-up failed for {}: {:#}", stat.ip, e));
            }
        }
        progress.inc();
    }
    writer.flush()?;

    progress.finish_with_message(&format!(
        "Queried {} IPs ({} failed)",
        report.queried, report.failed
    ));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_url_without_token() {
        let client = IpInfoClient::new("https://ipinfo.io/".to_string(), None).unwrap();
        assert_eq!(client.base_url(), "https://ipinfo.io");
        assert_eq!(client.geo_url("192.0.2.1"), "https://ipinfo.io/192.0.2.1/geo");
    }

    #[test]
    fn test_geo_url_with_token() {
        let client =
            IpInfoClient::new("http://127.0.0.1:8080".to_string(), Some("abc123".to_string()))
                .unwrap();
        assert_eq!(
            client.geo_url("192.0.2.1"),
            "http://127.0.0.1:8080/192.0.2.1/geo?token=abc123"
        );
    }

    #[test]
    fn test_empty_token_ignored() {
        let client = IpInfoClient::new(DEFAULT_LOOKUP_URL.to_string(), Some(String::new())).unwrap();
        assert_eq!(client.geo_url("192.0.2.1"), "https://ipinfo.io/192.0.2.1/geo");
    }

    #[test]
    fn test_from_options_prefers_arguments() {
        let client = IpInfoClient::from_options(Some("http://localhost:9999"), Some("t")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999");
        assert_eq!(client.geo_url("x"), "http://localhost:9999/x/geo?token=t");
    }

    #[test]
    fn test_rate_limit_detection() {
        assert!(is_rate_limited(StatusCode::TOO_MANY_REQUESTS, ""));
        assert!(is_rate_limited(StatusCode::OK, "Rate limit exceeded."));
        assert!(!is_rate_limited(StatusCode::OK, "{\"ip\": \"192.0.2.1\"}"));
    }
}
