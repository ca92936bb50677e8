//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::{Args, Subcommand};

/// Record command arguments.
#[derive(Debug, Args)]
pub struct RecordCommand {
    /// Rainfall in inches
    pub amount: f64,

    /// Day of the reading (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

impl RecordCommand {
    /// Year, month, and 0-based day slot for this reading.
    ///
    /// `today` is used when no date was given.
    #[must_use]
    pub fn slot(&self, today: NaiveDate) -> (i32, u32, i64) {
        let date = self.date.unwrap_or(today);
        (date.year(), date.month(), i64::from(date.day0()))
    }
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Only show this year
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_slot_with_date() {
        let cmd = RecordCommand {
            amount: 0.5,
            date: NaiveDate::from_ymd_opt(2021, 2, 1),
        };
        let today = NaiveDate::from_ymd_opt(2030, 6, 15).unwrap();
        assert_eq!(cmd.slot(today), (2021, 2, 0));
    }

    #[test]
    fn test_record_slot_defaults_to_today() {
        let cmd = RecordCommand {
            amount: 0.5,
            date: None,
        };
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(cmd.slot(today), (2024, 2, 28));
    }
}
