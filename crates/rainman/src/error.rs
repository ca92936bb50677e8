//! Error types for rainman.
//!
//! Every fallible operation in the crate returns [`Result`]. Load and save
//! failures are never swallowed; the caller decides how to report them and
//! whether to exit.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rainman operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// A file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path of the file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the data directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The location name cannot be used to derive file names.
    #[error("invalid location name {name:?}: {reason}")]
    InvalidLocation {
        /// The name as given.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The binary snapshot failed its magic or digest check.
    #[error("corrupt snapshot {path}: {message}")]
    Corrupt {
        /// Path to the snapshot file.
        path: PathBuf,
        /// Description of the failed check.
        message: String,
    },

    /// Binary encoding or decoding failed.
    #[error("snapshot encoding error: {0}")]
    Encode(#[from] bincode::Error),

    // === Validation Errors ===
    /// A month number outside 1-12.
    #[error("month {month} outside acceptable range")]
    MonthOutOfRange {
        /// The offending month.
        month: i64,
    },

    /// A record line is malformed.
    #[error("malformed record: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },

    /// A line of the delimited file failed to load.
    #[error("{path}:{line}: {source}")]
    Line {
        /// Path to the delimited file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        #[source]
        source: Box<Error>,
    },

    /// A row carries the wrong number of day values for its month.
    #[error("wrong number of days in {year} {month}: expected {expected}, found {found}")]
    DayCount {
        /// Year of the row.
        year: i32,
        /// Month of the row.
        month: u32,
        /// Days in that month.
        expected: usize,
        /// Day values present in the row.
        found: usize,
    },

    /// The same year and month appear on two lines.
    #[error("duplicate entry for {year} {month}")]
    DuplicateMonth {
        /// Year of the repeated row.
        year: i32,
        /// Month of the repeated row.
        month: u32,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },
}

/// A specialized Result type for rainman operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Attach a path to an I/O error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error for a malformed record.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Locate this error at `line` of the delimited file at `path`.
    #[must_use]
    pub fn at_line(self, path: impl Into<PathBuf>, line: usize) -> Self {
        Self::Line {
            path: path.into(),
            line,
            source: Box::new(self),
        }
    }

    /// Check if this error comes from malformed or out-of-range data.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::MonthOutOfRange { .. }
                | Self::Parse { .. }
                | Self::Line { .. }
                | Self::DayCount { .. }
                | Self::DuplicateMonth { .. }
                | Self::Corrupt { .. }
        )
    }

    /// Check if this error is a file system failure.
    #[must_use]
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::DirectoryCreate { .. })
    }
}
