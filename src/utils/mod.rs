//! Utility functions and helpers.
//!
//! This module provides common functionality used across the pipelines:
//!
//! - [`reader`] - Smart file reader with automatic decompression
//! - [`progress`] - Progress tracking and display utilities
//! - [`format`] - Number formatting for operator output and CSV cells
//! - [`time`] - Run stamps, log timestamp parsing and elapsed time
//!
//! # Examples
//!
//! ## Reading compressed files
//!
//! ```no_run
//! use fail2ban_analysis_tools::utils::reader::read_text;
//!
//! // Automatically decompresses .gz and .zst files
//! let text = read_text("/var/log/fail2ban.log.2.gz").unwrap();
//! println!("{} bytes", text.len());
//! ```

pub mod format;
pub mod progress;
pub mod reader;
pub mod time;
