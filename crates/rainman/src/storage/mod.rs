//! Storage layer for rainman.
//!
//! A [`RecordStore`] owns one location's [`RainfallSeries`] and the files it
//! persists to:
//!
//! - `<LOC>.rm`, a binary snapshot and the primary form
//! - `<LOC>-raindata.txt`, delimited text and the secondary form
//! - `<LOC>-raindata.txt.bak`, a copy of the text form taken before each save
//!
//! Opening a store loads the snapshot if present, otherwise the text file,
//! otherwise starts empty. Nothing is written until [`RecordStore::flush`] or
//! [`RecordStore::close`]; [`RecordStore::with`] runs a closure and flushes
//! afterwards if any record was written.
//!
//! A store assumes it is the only user of its files. Opening two stores for
//! the same location at once is not supported.

pub mod binary;
pub mod paths;
pub mod text;

use std::fmt;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::series::RainfallSeries;

pub use paths::{normalize_location, StorePaths};

/// Which file a store's series was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// The binary snapshot.
    Snapshot,
    /// The delimited text file, because no snapshot existed.
    Delimited,
    /// Neither file existed.
    Empty,
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snapshot => write!(f, "snapshot"),
            Self::Delimited => write!(f, "delimited text"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// Rainfall records for a single location.
#[derive(Debug)]
pub struct RecordStore {
    /// Normalized location name.
    location: String,
    /// Files derived from the location.
    paths: StorePaths,
    /// The records themselves.
    series: RainfallSeries,
    /// Where `series` came from when the store was opened.
    source: LoadSource,
    /// Copy the text file to its backup before each save.
    backup: bool,
    /// A record has been written since the store was opened.
    dirty: bool,
}

impl RecordStore {
    /// Open the store for `location` inside `data_dir`.
    ///
    /// The directory is created if missing. Backups are enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the location name is invalid, the directory cannot
    /// be created, or existing data fails to load.
    pub fn open(data_dir: impl AsRef<Path>, location: &str) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let location = normalize_location(location)?;

        if !data_dir.exists() {
            fs::create_dir_all(data_dir).map_err(|source| Error::DirectoryCreate {
                path: data_dir.to_path_buf(),
                source,
            })?;
        }

        let paths = StorePaths::new(data_dir, &location);
        let (series, source) = Self::load(&paths)?;
        info!(
            "Opened {} with {} month(s) from {}",
            location,
            series.month_count(),
            source
        );

        Ok(Self {
            location,
            paths,
            series,
            source,
            backup: true,
            dirty: false,
        })
    }

    /// Open the store for `location` using the configured data directory and
    /// backup setting.
    ///
    /// # Errors
    ///
    /// See [`RecordStore::open`].
    pub fn from_config(config: &Config, location: &str) -> Result<Self> {
        let mut store = Self::open(config.data_dir(), location)?;
        store.backup = config.storage.backup;
        Ok(store)
    }

    /// Open a store, run `f` on it, then flush it if `f` wrote any record.
    ///
    /// The flush happens whether `f` returns `Ok`, returns `Err`, or panics.
    /// A store that was only read is left untouched on disk, backup included.
    /// An error from `f` is returned in preference to a flush error.
    ///
    /// # Errors
    ///
    /// Returns an error if opening fails, `f` fails, or the flush fails.
    pub fn with<T, F>(config: &Config, location: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let mut store = Self::from_config(config, location)?;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(&mut store)));
        let flushed = if store.dirty {
            store.close()
        } else {
            debug!("No changes to {}, skipping flush", store.location);
            Ok(())
        };

        match outcome {
            Ok(Ok(value)) => flushed.map(|()| value),
            Ok(Err(err)) => {
                if let Err(flush_err) = flushed {
                    warn!("Flush after failed operation also failed: {}", flush_err);
                }
                Err(err)
            }
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Load a series from `paths`, preferring the snapshot over the text file.
    ///
    /// A snapshot is used as-is. Without one, the text file is parsed and
    /// validated line by line. Without either, the series is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or decoded. There is
    /// no fallback from a bad snapshot to the text file.
    pub fn load(paths: &StorePaths) -> Result<(RainfallSeries, LoadSource)> {
        if paths.snapshot.exists() {
            debug!("Loading snapshot {}", paths.snapshot.display());
            let series = binary::read_snapshot(&paths.snapshot)?;
            return Ok((series, LoadSource::Snapshot));
        }

        if paths.records.exists() {
            debug!("Loading delimited records {}", paths.records.display());
            let series = text::read_records(&paths.records)?;
            return Ok((series, LoadSource::Delimited));
        }

        debug!("No existing data for {}", paths.records.display());
        Ok((RainfallSeries::new(), LoadSource::Empty))
    }

    /// Normalized location name.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Files this store reads and writes.
    #[must_use]
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Read-only view of the records.
    #[must_use]
    pub fn series(&self) -> &RainfallSeries {
        &self.series
    }

    /// Where the records came from when the store was opened.
    #[must_use]
    pub fn load_source(&self) -> LoadSource {
        self.source
    }

    /// Whether a record has been written since the store was opened.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record rainfall for the 0-based `day` of `month` in `year`.
    ///
    /// See [`RainfallSeries::set_record`].
    ///
    /// # Errors
    ///
    /// Returns an error if `month` is not in 1-12.
    pub fn set_record(&mut self, year: i32, month: u32, day: i64, amount: f64) -> Result<bool> {
        let written = self.series.set_record(year, month, day, amount)?;
        self.dirty |= written;
        Ok(written)
    }

    /// Persist the series in both forms.
    ///
    /// The text file is first copied to its backup; a failed backup is logged
    /// and does not stop the save. Both forms are then rewritten from scratch.
    /// A failure writing one form does not prevent the attempt on the other.
    ///
    /// # Errors
    ///
    /// Returns the first write error.
    pub fn flush(&self) -> Result<()> {
        if self.backup {
            self.backup_records();
        }

        let snapshot = binary::write_snapshot(&self.paths.snapshot, &self.series);
        if let Err(e) = &snapshot {
            warn!("Failed to write snapshot: {}", e);
        }
        let records = text::write_records(&self.paths.records, &self.series);
        if let Err(e) = &records {
            warn!("Failed to write delimited records: {}", e);
        }

        snapshot.and(records)?;
        info!(
            "Saved {} month(s) for {}",
            self.series.month_count(),
            self.location
        );
        Ok(())
    }

    /// Flush and release the store.
    ///
    /// # Errors
    ///
    /// See [`RecordStore::flush`].
    pub fn close(self) -> Result<()> {
        self.flush()
    }

    fn backup_records(&self) {
        if !self.paths.records.exists() {
            return;
        }
        match fs::copy(&self.paths.records, &self.paths.backup) {
            Ok(bytes) => debug!(
                "Backed up {} byte(s) to {}",
                bytes,
                self.paths.backup.display()
            ),
            Err(e) => warn!(
                "Could not create backup file {}: {}",
                self.paths.backup.display(),
                e
            ),
        }
    }
}
