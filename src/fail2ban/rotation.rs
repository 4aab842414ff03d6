//! Rotation scheme detection and chronological ordering of rotated logs.
//!
//! Two naming conventions are recognised:
//!
//! - **Numeric** (Debian): `fail2ban.log`, `fail2ban.log.1`, `fail2ban.log.2.gz`, ...
//!   A higher suffix is older; the unsuffixed file is the newest.
//! - **Dated** (Fedora/RHEL/CentOS): `fail2ban.log`, `fail2ban.log-20200101`,
//!   `fail2ban.log-20200102.gz`, ... Dates sort oldest first; the undated file is
//!   the newest.
//!
//! The scheme is decided from the second name in lexicographic order once any
//! compression suffix is removed.

use crate::error::AnalysisError;
use std::cmp::Reverse;

/// Compression suffixes stripped before a name is classified.
const COMPRESSION_SUFFIXES: [&str; 2] = [".gz", ".zst"];

/// Rotation naming convention of a set of log files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationScheme {
    /// Only one file was selected; no detection was needed
    Single,
    /// `.1`, `.2`, ... suffixes (Debian)
    Numeric,
    /// `-YYYYMMDD` suffixes (Fedora)
    Dated,
}

impl RotationScheme {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Single => "single log file",
            Self::Numeric => "Debian log rotation system",
            Self::Dated => "Fedora log rotation system",
        }
    }
}

/// Removes a trailing `.gz` / `.zst` suffix.
pub fn strip_compression(name: &str) -> &str {
    COMPRESSION_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Classifies a single rotated file name, or `None` if it matches neither scheme.
pub fn classify(name: &str) -> Option<RotationScheme> {
    let stem = strip_compression(name);
    let after_dot = stem.rsplit('.').next().unwrap_or("");
    if is_digits(after_dot) {
        return Some(RotationScheme::Numeric);
    }
    let after_hyphen = stem.rsplit('-').next().unwrap_or("");
    if is_digits(after_hyphen) {
        return Some(RotationScheme::Dated);
    }
    None
}

/// Rotation index of a numeric-scheme name; the live file counts as 0.
fn rotation_index(name: &str) -> u64 {
    strip_compression(name)
        .rsplit('.')
        .next()
        .filter(|suffix| is_digits(suffix))
        .and_then(|suffix| suffix.parse().ok())
        .unwrap_or(0)
}

/// Detects the rotation scheme of `names` and returns them oldest first.
///
/// Numeric names are ordered by their rotation index rather than by string
/// comparison, so `.10` correctly precedes `.9`.
pub fn order_oldest_first(names: &[String]) -> Result<(RotationScheme, Vec<String>), AnalysisError> {
    let mut sorted = names.to_vec();
    sorted.sort();

    if sorted.len() < 2 {
        return Ok((RotationScheme::Single, sorted));
    }

    let second = &sorted[1];
    match classify(second) {
        Some(RotationScheme::Numeric) => {
            sorted.sort_by_key(|name| Reverse(rotation_index(name)));
            Ok((RotationScheme::Numeric, sorted))
        }
        Some(RotationScheme::Dated) => {
            // Undated live file sorts first; it is the newest.
            sorted.rotate_left(1);
            Ok((RotationScheme::Dated, sorted))
        }
        _ => Err(AnalysisError::UnrecognisedRotation {
            name: second.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numeric_scheme() {
        let (scheme, ordered) = order_oldest_first(&names(&["log", "log.1", "log.2.gz"])).unwrap();
        assert_eq!(scheme, RotationScheme::Numeric);
        assert_eq!(ordered, names(&["log.2.gz", "log.1", "log"]));
    }

    #[test]
    fn test_dated_scheme() {
        let (scheme, ordered) =
            order_oldest_first(&names(&["log", "log-20200101", "log-20200102.gz"])).unwrap();
        assert_eq!(scheme, RotationScheme::Dated);
        assert_eq!(ordered, names(&["log-20200101", "log-20200102.gz", "log"]));
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let (_, ordered) = order_oldest_first(&names(&["log.1", "log.2.gz", "log"])).unwrap();
        assert_eq!(ordered, names(&["log.2.gz", "log.1", "log"]));
    }

    #[test]
    fn test_numeric_scheme_double_digit_suffixes() {
        let (_, ordered) =
            order_oldest_first(&names(&["log", "log.1", "log.10.gz", "log.2.gz", "log.9.gz"])).unwrap();
        assert_eq!(
            ordered,
            names(&["log.10.gz", "log.9.gz", "log.2.gz", "log.1", "log"])
        );
    }

    #[test]
    fn test_single_file_skips_detection() {
        let (scheme, ordered) = order_oldest_first(&names(&["whatever.name"])).unwrap();
        assert_eq!(scheme, RotationScheme::Single);
        assert_eq!(ordered, names(&["whatever.name"]));
    }

    #[test]
    fn test_unrecognised_scheme() {
        let err = order_oldest_first(&names(&["log", "log.old"])).unwrap_err();
        assert!(err.to_string().contains("log.old"));
    }

    #[test]
    fn test_classify_zstd_suffix() {
        assert_eq!(classify("fail2ban.log.3.zst"), Some(RotationScheme::Numeric));
        assert_eq!(classify("fail2ban.log-20240101.zst"), Some(RotationScheme::Dated));
        assert_eq!(classify("fail2ban.log"), None);
    }
}
