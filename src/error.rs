//! Fatal error conditions of the analysis and conversion pipelines.
//!
//! Anything in this enum terminates a run with a non-zero exit status.
//! Recoverable problems (an unreadable rotated file, a malformed CSV row, a
//! rate-limited lookup) are reported as warnings and never reach this type.

use thiserror::Error;

/// Fatal, domain-level failures.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No file matching the ban-log naming convention was found
    #[error("no logs found in {dir} - exiting")]
    NoLogsFound { dir: String },

    /// Every selected log file was unreadable or empty
    #[error("no log lines could be read - exiting")]
    EmptyCorpus,

    /// The rotated file names follow neither the numeric nor the date scheme
    #[error(
        "unrecognised logfile {name} - only standard Debian and Fedora rotated logs can be processed"
    )]
    UnrecognisedRotation { name: String },

    /// A pre-fetched geolocation file was named but does not exist
    #[error("specified raw attacker info file cannot be found: {path}")]
    GeoFileMissing { path: String },

    /// Geolocation results are not aligned with the unique IP set
    #[error(
        "country look-up data not available or incomplete: {expected} unique IPs but {ips} IPs, {countries} countries, {lats} lats and {lons} lons"
    )]
    GeoCountMismatch {
        expected: usize,
        ips: usize,
        countries: usize,
        lats: usize,
        lons: usize,
    },

    /// The converter input does not carry the unique-IP CSV header
    #[error("input file {path} does not appear to be valid - must be CSV in form '{expected}'")]
    InvalidCsvHeader { path: String, expected: String },

    /// The converter input file does not exist
    #[error("cannot find input CSV file: {path}")]
    InputMissing { path: String },

    /// The directory of a requested output file does not exist
    #[error("specified output directory '{path}' does not exist")]
    OutputDirMissing { path: String },
}
