//! Ban event extraction.
//!
//! A fail2ban ban line looks like:
//!
//! ```text
//! 2020-01-18 06:25:13,527 fail2ban.actions [620]: NOTICE  [sshd] Ban 192.0.2.17
//! ```
//!
//! Any line containing the marker `"Ban "` is an event. The timestamp is the
//! first 19 characters of the line and the IP is the token directly after the
//! marker, up to the next whitespace. `Unban` lines do not match because the
//! marker is case-sensitive.

use super::types::LogRecord;

/// Substring identifying a ban line
pub const BAN_MARKER: &str = "Ban ";

/// Length of the `YYYY-MM-DD HH:MM:SS` timestamp prefix
pub const TIMESTAMP_LEN: usize = 19;

fn leading_chars(line: &str, n: usize) -> &str {
    match line.char_indices().nth(n) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

/// Extracts the ban event from one line, if the line is a ban line.
pub fn parse_line(line: &str) -> Option<LogRecord> {
    let marker_at = line.find(BAN_MARKER)?;
    let rest = &line[marker_at + BAN_MARKER.len()..];
    let ip = rest.split(char::is_whitespace).next().unwrap_or("");

    Some(LogRecord {
        timestamp: leading_chars(line, TIMESTAMP_LEN).to_string(),
        ip: ip.to_string(),
    })
}

/// Extracts every ban event from the corpus, in line order.
pub fn extract_events(corpus: &str) -> Vec<LogRecord> {
    corpus.lines().filter_map(parse_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAN: &str =
        "2020-01-18 06:25:13,527 fail2ban.actions        [620]: NOTICE  [sshd] Ban 192.0.2.17";

    #[test]
    fn test_parse_ban_line() {
        let record = parse_line(BAN).unwrap();
        assert_eq!(record.timestamp, "2020-01-18 06:25:13");
        assert_eq!(record.ip, "192.0.2.17");
    }

    #[test]
    fn test_ip_stops_at_whitespace() {
        let record = parse_line("2020-01-18 06:25:13,527 [sshd] Ban 192.0.2.17 after 5 attempts")
            .unwrap();
        assert_eq!(record.ip, "192.0.2.17");
    }

    #[test]
    fn test_non_ban_lines_ignored() {
        assert!(parse_line("2020-01-18 06:35:13,527 [sshd] Unban 192.0.2.17").is_none());
        assert!(parse_line("2020-01-18 06:25:10,001 [sshd] Found 192.0.2.17").is_none());
        assert!(parse_line("").is_none());
    }

    #[test]
    fn test_short_line_keeps_whole_prefix() {
        let record = parse_line("x Ban 1.2.3.4").unwrap();
        assert_eq!(record.timestamp, "x Ban 1.2.3.4");
        assert_eq!(record.ip, "1.2.3.4");
    }

    #[test]
    fn test_extract_preserves_line_order() {
        let corpus = format!(
            "{}\nnoise\n2020-01-19 00:00:00,000 [sshd] Ban 198.51.100.1\r\n{}\n",
            BAN, BAN
        );
        let events = extract_events(&corpus);
        let ips: Vec<&str> = events.iter().map(|e| e.ip.as_str()).collect();
        assert_eq!(ips, vec!["192.0.2.17", "198.51.100.1", "192.0.2.17"]);
        assert_eq!(events[1].timestamp, "2020-01-19 00:00:00");
    }

    #[test]
    fn test_no_events() {
        assert!(extract_events("nothing\nto see\n").is_empty());
    }
}
