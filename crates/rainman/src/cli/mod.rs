//! Command-line interface for rainman.
//!
//! This module provides the CLI structure for the `rainman` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, RecordCommand, ShowCommand};

use crate::config::Config;
use crate::error::{Error, Result};

/// rainman - Keep daily rainfall records per location
///
/// Records are stored per location as a binary snapshot plus a comma
/// separated text copy, with a backup of the text taken on every save.
#[derive(Debug, Parser)]
#[command(name = "rainman")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Location whose records to use
    #[arg(short, long, global = true, value_name = "NAME")]
    pub location: Option<String>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a day's rainfall
    Record(RecordCommand),

    /// Print stored records
    Show(ShowCommand),

    /// Write the summary report
    Summary,

    /// Print the files used for the location
    Paths,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }

    /// The location to operate on: the flag, else the configured default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] if neither is set.
    pub fn location<'a>(&'a self, config: &'a Config) -> Result<&'a str> {
        self.location
            .as_deref()
            .or(config.storage.default_location.as_deref())
            .ok_or_else(|| Error::InvalidLocation {
                name: String::new(),
                reason: "no location given and no default_location configured",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "rainman");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        use crate::logging::Verbosity;

        assert_eq!(parse(&["rainman", "paths"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["rainman", "-v", "paths"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["rainman", "-vv", "paths"]).verbosity(), Verbosity::Trace);
        assert_eq!(parse(&["rainman", "-q", "paths"]).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_parse_record() {
        let cli = parse(&["rainman", "-l", "akron", "record", "0.5", "--date", "2021-02-01"]);
        assert_eq!(cli.location.as_deref(), Some("akron"));
        match cli.command {
            Command::Record(cmd) => {
                assert!((cmd.amount - 0.5).abs() < f64::EPSILON);
                assert_eq!(cmd.date, chrono::NaiveDate::from_ymd_opt(2021, 2, 1));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_record_rejects_bad_date() {
        let result = Cli::try_parse_from(["rainman", "record", "0.5", "--date", "2021-02-30"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_show() {
        let cli = parse(&["rainman", "show", "--year", "2021", "--json"]);
        match cli.command {
            Command::Show(cmd) => {
                assert_eq!(cmd.year, Some(2021));
                assert!(cmd.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["rainman", "-c", "/custom/config.toml", "summary"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert!(matches!(cli.command, Command::Summary));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["rainman", "config", "validate", "--file", "x.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_location_prefers_flag() {
        let mut config = Config::default();
        config.storage.default_location = Some("canton".to_string());

        let cli = parse(&["rainman", "--location", "akron", "paths"]);
        assert_eq!(cli.location(&config).unwrap(), "akron");

        let cli = parse(&["rainman", "paths"]);
        assert_eq!(cli.location(&config).unwrap(), "canton");
    }

    #[test]
    fn test_location_missing() {
        let cli = parse(&["rainman", "paths"]);
        let err = cli.location(&Config::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidLocation { .. }));
    }
}
