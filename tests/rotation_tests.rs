//! Log discovery across rotation schemes and compression formats
use fail2ban_analysis_tools::error::AnalysisError;
use fail2ban_analysis_tools::fail2ban::loader::load_logs;
use fail2ban_analysis_tools::fail2ban::parser::extract_events;
use fail2ban_analysis_tools::fail2ban::rotation::{order_oldest_first, RotationScheme};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

fn ban(day: &str, ip: &str) -> String {
    format!(
        "2020-01-{} 12:00:00,000 fail2ban.actions [620]: NOTICE  [sshd] Ban {}\n",
        day, ip
    )
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_detect_schemes() {
    let (scheme, ordered) = order_oldest_first(&names(&["log", "log.1", "log.2.gz"])).unwrap();
    assert_eq!(scheme, RotationScheme::Numeric);
    assert_eq!(ordered, names(&["log.2.gz", "log.1", "log"]));

    let (scheme, ordered) =
        order_oldest_first(&names(&["log", "log-20200101", "log-20200102.gz"])).unwrap();
    assert_eq!(scheme, RotationScheme::Dated);
    assert_eq!(ordered, names(&["log-20200101", "log-20200102.gz", "log"]));
}

#[test]
fn test_dated_mixed_compression_events_in_order() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("fail2ban.log-20200101.zst"),
        zstd::encode_all(ban("01", "192.0.2.1").as_bytes(), 3).unwrap(),
    )
    .unwrap();

    let file = fs::File::create(dir.path().join("fail2ban.log-20200102.gz")).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(ban("02", "192.0.2.2").as_bytes()).unwrap();
    encoder.finish().unwrap();

    fs::write(dir.path().join("fail2ban.log"), ban("03", "192.0.2.3")).unwrap();

    let corpus = load_logs(dir.path(), None).unwrap();
    assert_eq!(corpus.scheme, RotationScheme::Dated);

    let ips: Vec<String> = extract_events(&corpus.text)
        .into_iter()
        .map(|e| e.ip)
        .collect();
    assert_eq!(ips, vec!["192.0.2.1", "192.0.2.2", "192.0.2.3"]);
}

#[test]
fn test_unrecognised_rotation_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("fail2ban.log"), ban("03", "192.0.2.3")).unwrap();
    fs::write(dir.path().join("fail2ban.log.old"), ban("02", "192.0.2.2")).unwrap();

    let err = load_logs(dir.path(), None).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::UnrecognisedRotation { .. })
    ));
}

#[test]
fn test_zero_logs_requested() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("fail2ban.log"), ban("03", "192.0.2.3")).unwrap();

    let err = load_logs(dir.path(), Some(0)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::NoLogsFound { .. })
    ));
}
