//! Invalid-login username ranking.
//!
//! The usernames file is prepared separately from the SSH auth logs, one
//! username per line, e.g.:
//!
//! ```bash
//! grep ssh /var/log/auth.log* | sed -n 's/.*invalid user \([^ ]*\).*/\1/p' | sort > usernames.txt
//! ```

use crate::utils::reader::read_text;
use std::collections::HashMap;
use std::path::Path;

/// Number of usernames listed in the summary
pub const TOP_USERS: usize = 6;

/// Most common usernames, highest count first; ties keep first appearance order.
pub fn top_usernames(text: &str, n: usize) -> Vec<(String, usize)> {
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for name in text.lines() {
        match index.get(name) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(name, order.len());
                order.push((name, 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(n)
        .map(|(name, count)| (name.to_string(), count))
        .collect()
}

/// `Top users: root (12), admin (5), `
pub fn format_top_users(top: &[(String, usize)]) -> String {
    let mut text = String::from("Top users: ");
    for (name, count) in top {
        text.push_str(&format!("{} ({}), ", name, count));
    }
    text
}

/// Summary line for the usernames file, or an empty line if it is missing.
pub fn username_line(path: &Path) -> String {
    if !path.is_file() {
        eprintln!(
            "[WARN] {} file not found - no username analysis possible",
            path.display()
        );
        return String::new();
    }

    eprintln!("Reading invalid usernames from {}...", path.display());
    match read_text(path) {
        Ok(text) => {
            let line = format_top_users(&top_usernames(&text, TOP_USERS));
            eprintln!("{}", line);
            line
        }
        Err(e) => {
            eprintln!("[WARN] Cannot read {}: {:#}", path.display(), e);
            String::new()
        }
    }
}
