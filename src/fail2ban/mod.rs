//! Core fail2ban log handling and data structures.
//!
//! ## Key Components
//!
//! - [`types`] - Records and statistics shared by every pipeline stage
//! - [`rotation`] - Debian (numeric) vs Fedora (date) rotation detection
//! - [`loader`] - Discovery and chronological concatenation of rotated logs
//! - [`parser`] - Ban event extraction from the combined log text
//!
//! ## Example
//!
//! ```no_run
//! use fail2ban_analysis_tools::fail2ban::{loader, parser};
//! use std::path::Path;
//!
//! let corpus = loader::load_logs(Path::new("/var/log"), None).unwrap();
//! for event in parser::extract_events(&corpus.text) {
//!     println!("{} banned {}", event.timestamp, event.ip);
//! }
//! ```

pub mod loader;
pub mod parser;
pub mod rotation;
pub mod types;
