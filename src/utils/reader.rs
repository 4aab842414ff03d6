//! Smart file reader with automatic decompression support.
//!
//! Provides transparent decompression for .gz and .zst files, so rotated
//! and compressed fail2ban logs can be read without manual extraction.
//!
//! # Supported Formats
//!
//! - Plain text files
//! - Gzip compressed files (.gz)
//! - Zstandard compressed files (.zst)
//!
//! # Examples
//!
//! ```no_run
//! use fail2ban_analysis_tools::utils::reader::open_file;
//! use std::io::{BufRead, BufReader};
//!
//! // Automatically handles .gz, .zst, or plain text
//! let reader = open_file("/var/log/fail2ban.log.2.gz").unwrap();
//! let buf_reader = BufReader::new(reader);
//!
//! for line in buf_reader.lines() {
//!     let line = line.unwrap();
//!     // Process line...
//! }
//! ```

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Opens a file, decompressing `.gz` and `.zst` by extension.
///
/// ```no_run
/// use fail2ban_analysis_tools::utils::reader::open_file;
/// use std::io::Read;
///
/// let mut reader = open_file("fail2ban.log.2.gz").unwrap();
/// let mut contents = String::new();
/// reader.read_to_string(&mut contents).unwrap();
/// ```
pub fn open_file(path: impl AsRef<Path>) -> Result<Box<dyn Read + Send>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match extension {
        "gz" => {
            let decoder = GzDecoder::new(file);
            Ok(Box::new(decoder))
        }
        "zst" => {
            let decoder = zstd::Decoder::new(file).with_context(|| {
                format!("Failed to create zstd decoder for: {}", path.display())
            })?;
            Ok(Box::new(decoder))
        }
        _ => Ok(Box::new(file)),
    }
}

/// Reads a whole (possibly compressed) file into a string.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD.
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mut reader = open_file(path)?;
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
