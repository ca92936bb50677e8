//! Location names and the file paths derived from them.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extension of the binary snapshot file.
const SNAPSHOT_SUFFIX: &str = ".rm";

/// Suffix of the delimited text file.
const RECORDS_SUFFIX: &str = "-raindata.txt";

/// Suffix appended to the delimited file name for its backup.
const BACKUP_SUFFIX: &str = ".bak";

/// Suffix of the human-readable summary.
const SUMMARY_SUFFIX: &str = "-summary.txt";

/// Canonicalize a location name.
///
/// Surrounding whitespace is trimmed and the rest is uppercased, so `"akron"`
/// and `" Akron "` name the same files.
///
/// # Errors
///
/// Returns [`Error::InvalidLocation`] if the name is empty or contains a path
/// separator or NUL.
pub fn normalize_location(name: &str) -> Result<String> {
    let trimmed = name.trim();
    let reject = |reason| {
        Err(Error::InvalidLocation {
            name: name.to_string(),
            reason,
        })
    };

    if trimmed.is_empty() {
        return reject("name is empty");
    }
    if trimmed.contains(['/', '\\']) {
        return reject("name contains a path separator");
    }
    if trimmed.contains('\0') {
        return reject("name contains NUL");
    }
    Ok(trimmed.to_uppercase())
}

/// The files owned by one location's store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    /// Binary snapshot, the primary form.
    pub snapshot: PathBuf,
    /// Delimited text, the secondary form.
    pub records: PathBuf,
    /// Single-generation copy of `records`.
    pub backup: PathBuf,
    /// Summary report.
    pub summary: PathBuf,
}

impl StorePaths {
    /// Derive the paths for an already normalized `location` inside `dir`.
    #[must_use]
    pub fn new(dir: &Path, location: &str) -> Self {
        let records = format!("{location}{RECORDS_SUFFIX}");
        Self {
            snapshot: dir.join(format!("{location}{SNAPSHOT_SUFFIX}")),
            backup: dir.join(format!("{records}{BACKUP_SUFFIX}")),
            records: dir.join(records),
            summary: dir.join(format!("{location}{SUMMARY_SUFFIX}")),
        }
    }
}
