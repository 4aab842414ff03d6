//! Discovery and loading of rotated fail2ban logs.
//!
//! Files whose name starts with `fail2ban.log` are collected from a
//! directory, ordered oldest first according to their rotation scheme, and
//! the newest `num_logs` of them are concatenated into one corpus so that
//! ban events come out in chronological order.
//!
//! IMPORTANT: the directory must not contain other files named
//! `fail2ban.log*` that are not rotated logs.

use crate::error::AnalysisError;
use crate::fail2ban::rotation::{order_oldest_first, RotationScheme};
use crate::utils::progress::ProgressBar;
use crate::utils::reader::read_text;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name prefix of every fail2ban log, rotated or not
pub const LOG_PREFIX: &str = "fail2ban.log";

/// Combined text of the selected logs
#[derive(Debug)]
pub struct LogCorpus {
    /// Detected rotation naming convention
    pub scheme: RotationScheme,
    /// Files that were selected, oldest first
    pub files: Vec<PathBuf>,
    /// Number of selected files that could not be read
    pub skipped: usize,
    /// Concatenated contents, oldest file first
    pub text: String,
}

/// Lists the names of all `fail2ban.log*` files in `dir`, sorted.
pub fn discover_logs(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read log directory: {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(LOG_PREFIX) && entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Number of logs to process: the request clamped to what is available.
pub fn clamp_log_count(requested: Option<usize>, available: usize) -> usize {
    match requested {
        Some(n) if n > available => {
            eprintln!(
                "[WARN] Only {} logs of the specified form found",
                available
            );
            available
        }
        Some(n) => n,
        None => available,
    }
}

/// Loads the newest `num_logs` logs from `dir` (all of them when `None`).
///
/// Unreadable files are skipped with a warning. Fails when no log file exists
/// or when nothing at all could be read.
pub fn load_logs(dir: &Path, num_logs: Option<usize>) -> Result<LogCorpus> {
    let names = discover_logs(dir)?;
    let count = clamp_log_count(num_logs, names.len());
    if count == 0 {
        return Err(AnalysisError::NoLogsFound {
            dir: dir.display().to_string(),
        }
        .into());
    }

    eprintln!("Using {} log files in {}", count, dir.display());

    let (scheme, ordered) = if count > 1 {
        order_oldest_first(&names)?
    } else {
        // The live log always sorts first and is the newest.
        (RotationScheme::Single, names[..1].to_vec())
    };
    if scheme != RotationScheme::Single {
        eprintln!("Using {}", scheme.describe());
    }

    let selected: Vec<PathBuf> = ordered[ordered.len() - count..]
        .iter()
        .map(|name| dir.join(name))
        .collect();

    let progress = ProgressBar::new(selected.len(), "Loading logs");
    let mut text = String::new();
    let mut skipped = 0;

    for path in &selected {
        progress.println(format!("Opening log file {}", path.display()));
        match read_text(path) {
            Ok(contents) => text.push_str(&contents),
            Err(e) => {
                skipped += 1;
                progress.println(format!(
                    "[WARN] Cannot open log file {} - check permissions? ({:#})",
                    path.display(),
                    e
                ));
            }
        }
        progress.inc();
    }
    progress.finish_with_message(&format!("Loaded {} log files", selected.len() - skipped));

    if text.is_empty() {
        return Err(AnalysisError::EmptyCorpus.into());
    }

    Ok(LogCorpus {
        scheme,
        files: selected,
        skipped,
        text,
    })
}
