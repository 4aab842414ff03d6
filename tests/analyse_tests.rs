//! End-to-end tests for the analyse command.
//! Geolocation is exercised by replaying raw response files; no network.
use fail2ban_analysis_tools::commands::analyse::{run, AnalyseOptions, GeoSource};
use fail2ban_analysis_tools::error::AnalysisError;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const OLDER_LOG: &str = "\
2020-01-01 08:00:00,100 fail2ban.filter         [620]: INFO    [sshd] Found 192.0.2.17 - 2020-01-01 08:00:00
2020-01-01 08:00:01,200 fail2ban.actions        [620]: NOTICE  [sshd] Ban 192.0.2.17
2020-01-01 09:30:00,300 fail2ban.actions        [620]: NOTICE  [sshd] Ban 198.51.100.4
2020-01-01 09:40:00,300 fail2ban.actions        [620]: NOTICE  [sshd] Unban 192.0.2.17
";

const NEWER_LOG: &str = "\
2020-01-02 10:00:00,000 fail2ban.actions        [620]: NOTICE  [sshd] Ban 192.0.2.17
2020-01-02 10:10:00,000 fail2ban.actions        [620]: NOTICE  [sshd] Unban 192.0.2.17
";

const RAW_GEO: &str = r#"{
  "ip": "192.0.2.17",
  "city": "Mountain View",
  "country": "US",
  "loc": "37.3860,-122.0838"
}{
  "ip": "198.51.100.4",
  "country": "CN",
  "loc": "39.9075,116.3972"
}"#;

fn write_gz(path: &Path, contents: &str) {
    let file = fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(contents.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

/// Log directory with a gzipped older log and a plain live log
fn create_log_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("fail2ban.log"), NEWER_LOG).unwrap();
    write_gz(&dir.path().join("fail2ban.log.1.gz"), OLDER_LOG);
    dir
}

fn options(logs: &Path, out: &Path, geo_source: GeoSource) -> AnalyseOptions {
    AnalyseOptions {
        directory: Some(logs.to_str().unwrap().to_string()),
        num_logs: None,
        geo_source,
        output_dir: out.to_path_buf(),
        usernames: out.join("no-usernames.txt"),
        lookup_url: None,
        lookup_token: None,
    }
}

/// Output file with the given suffix; the date stem depends on the run day
fn find_output(dir: &Path, suffix: &str) -> Option<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .find(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(suffix))
        })
}

fn read_output(dir: &Path, suffix: &str) -> String {
    let path = find_output(dir, suffix).unwrap_or_else(|| panic!("missing output {}", suffix));
    fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_analyse_with_geo_file() {
    let logs = create_log_dir();
    let out = TempDir::new().unwrap();
    let raw = out.path().join("replay.txt");
    fs::write(&raw, RAW_GEO).unwrap();

    run(&options(logs.path(), out.path(), GeoSource::File(raw)))
        .await
        .unwrap();

    let raw_logs = read_output(out.path(), "_all_raw_logs.txt");
    assert_eq!(raw_logs, format!("{}{}", OLDER_LOG, NEWER_LOG));

    let all = read_output(out.path(), "_attack_IPs_all.csv");
    let lines: Vec<&str> = all.lines().collect();
    assert_eq!(lines[0], "Timestamp,IP address,Country,Latitude,Longitude");
    assert_eq!(lines[1], "2020-01-01 08:00:01,192.0.2.17,US,37.3860,-122.0838");
    assert_eq!(lines[3], "2020-01-02 10:00:00,192.0.2.17,US,37.3860,-122.0838");
    assert_eq!(lines.len(), 4);

    let unique = read_output(out.path(), "_attack_IPs_unique.csv");
    let lines: Vec<&str> = unique.lines().collect();
    assert_eq!(
        lines,
        vec![
            "IP address,Number of Attacks,Country,Latitude,Longitude",
            "192.0.2.17,2,US,37.3860,-122.0838",
            "198.51.100.4,1,CN,39.9075,116.3972",
        ]
    );

    let subnets = read_output(out.path(), "_attack_IPs_unique_subnet.csv");
    let lines: Vec<&str> = subnets.lines().collect();
    assert_eq!(lines[0], "Subnet (/24),Number of Attacks,Country,Latitude,Longitude");
    assert_eq!(lines[1], "192.0.2.0,2,US,37.3860,-122.0838");

    let by_country = read_output(out.path(), "_attack_by_country_all_IPs.csv");
    let lines: Vec<&str> = by_country.lines().collect();
    assert_eq!(lines[0], "Country,Number of Attacks,Percentage");
    assert!(lines[1].starts_with("US,2,66.6"));
    assert_eq!(lines[2], "CN,1,33.333333333333336");

    let by_ip = read_output(out.path(), "_attack_by_country_unique_IPs.csv");
    assert!(by_ip.starts_with("Country,Number of IPs,Percentage\n"));
    assert!(by_ip.contains("CN,1,50.0"));

    let summary = read_output(out.path(), "_log_analysis_summary.txt");
    assert!(summary.contains("Log files processed: 2\n"));
    assert!(summary.contains("Total Attacks: 3\n"));
    assert!(summary.contains("Unique IPs: 2\n"));
    assert!(summary.contains("First Attack: 2020-01-01 08:00:01\n"));
    assert!(summary.contains("Last Attack: 2020-01-02 10:00:00\n"));
    assert!(summary.contains("Top 3 offenders (IP): 1-192.0.2.17 (2); 2-198.51.100.4 (1)\n"));
    assert!(summary.contains("Attacks total number of countries: 2\n"));
    assert!(summary.contains("Top 3 countries for most attacks:  1 US (2); 2 CN (1)\n"));

    for suffix in [
        "_attacks_per_day_bar.svg",
        "_country_hist_all.svg",
        "_country_hist_unique_IP.svg",
        "_country_hist_unique_subnet.svg",
    ] {
        assert!(read_output(out.path(), suffix).starts_with("<svg"));
    }
}

#[tokio::test]
async fn test_analyse_without_lookup() {
    let logs = create_log_dir();
    let out = TempDir::new().unwrap();

    run(&options(logs.path(), out.path(), GeoSource::Disabled))
        .await
        .unwrap();

    let unique = read_output(out.path(), "_attack_IPs_unique.csv");
    assert!(unique.starts_with("IP address,Number of Attacks\n192.0.2.17,2\n"));

    let summary = read_output(out.path(), "_log_analysis_summary.txt");
    assert!(summary.contains("Total Attacks: 3\n"));
    assert!(!summary.contains("countries"));

    assert!(find_output(out.path(), "_attacks_per_day_bar.svg").is_some());
    assert!(find_output(out.path(), "_attack_by_country_all_IPs.csv").is_none());
}

#[tokio::test]
async fn test_newest_log_only() {
    let logs = create_log_dir();
    let out = TempDir::new().unwrap();
    let mut opts = options(logs.path(), out.path(), GeoSource::Disabled);
    opts.num_logs = Some(1);

    run(&opts).await.unwrap();

    let all = read_output(out.path(), "_attack_IPs_all.csv");
    assert_eq!(all.lines().count(), 2);
    let summary = read_output(out.path(), "_log_analysis_summary.txt");
    assert!(summary.contains("Log files processed: 1\n"));
}

#[tokio::test]
async fn test_usernames_reported() {
    let logs = create_log_dir();
    let out = TempDir::new().unwrap();
    let mut opts = options(logs.path(), out.path(), GeoSource::Disabled);
    opts.usernames = out.path().join("usernames.txt");
    fs::write(&opts.usernames, "admin\nroot\nadmin\n").unwrap();

    run(&opts).await.unwrap();

    let summary = read_output(out.path(), "_log_analysis_summary.txt");
    assert!(summary.contains("Top users: admin (2), root (1), \n"));
}

#[tokio::test]
async fn test_geo_count_mismatch_is_fatal() {
    let logs = create_log_dir();
    let out = TempDir::new().unwrap();
    let raw = out.path().join("replay.txt");
    fs::write(
        &raw,
        "{\n  \"ip\": \"192.0.2.17\",\n  \"country\": \"US\",\n  \"loc\": \"37.3860,-122.0838\"\n}",
    )
    .unwrap();

    let err = run(&options(logs.path(), out.path(), GeoSource::File(raw)))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::GeoCountMismatch {
            expected: 2,
            ips: 1,
            ..
        })
    ));

    // First-pass tables stay without location columns
    let unique = read_output(out.path(), "_attack_IPs_unique.csv");
    assert_eq!(unique.lines().next(), Some("IP address,Number of Attacks"));
    assert!(find_output(out.path(), "_attack_by_country_all_IPs.csv").is_none());
}

#[tokio::test]
async fn test_missing_geo_file_writes_nothing() {
    let logs = create_log_dir();
    let out = TempDir::new().unwrap();
    let raw = out.path().join("does-not-exist.txt");

    let err = run(&options(logs.path(), out.path(), GeoSource::File(raw)))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::GeoFileMissing { .. })
    ));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_empty_log_dir_is_fatal() {
    let logs = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let err = run(&options(logs.path(), out.path(), GeoSource::Disabled))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::NoLogsFound { .. })
    ));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_no_ban_events_succeeds() {
    let logs = TempDir::new().unwrap();
    fs::write(
        logs.path().join("fail2ban.log"),
        "2020-01-01 08:00:00,100 fail2ban.server [1]: INFO Starting Fail2ban\n",
    )
    .unwrap();
    let out = TempDir::new().unwrap();

    run(&options(logs.path(), out.path(), GeoSource::Disabled))
        .await
        .unwrap();

    assert!(find_output(out.path(), "_all_raw_logs.txt").is_some());
    assert!(find_output(out.path(), "_attack_IPs_all.csv").is_none());
    assert!(find_output(out.path(), "_log_analysis_summary.txt").is_none());
}

#[tokio::test]
async fn test_missing_output_dir_is_fatal() {
    let logs = create_log_dir();
    let out = TempDir::new().unwrap();

    let err = run(&options(
        logs.path(),
        &out.path().join("missing"),
        GeoSource::Disabled,
    ))
    .await
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::OutputDirMissing { .. })
    ));
}
