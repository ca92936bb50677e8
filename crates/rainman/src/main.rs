//! `rainman` - CLI for rainman
//!
//! Thin driver over [`rainman::RecordStore`]: every command that touches
//! records opens the store, does its work, and flushes it on the way out.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use rainman::cli::{Cli, Command, ConfigCommand, RecordCommand, ShowCommand};
use rainman::storage::{normalize_location, text};
use rainman::{init_logging, summary, Config, RecordStore, StorePaths};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match &cli.command {
        Command::Record(cmd) => handle_record(&config, cli.location(&config)?, cmd),
        Command::Show(cmd) => handle_show(&config, cli.location(&config)?, cmd),
        Command::Summary => handle_summary(&config, cli.location(&config)?),
        Command::Paths => handle_paths(&config, cli.location(&config)?),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_record(config: &Config, location: &str, cmd: &RecordCommand) -> anyhow::Result<()> {
    let today = chrono::Local::now().date_naive();
    let (year, month, day) = cmd.slot(today);

    let name = RecordStore::with(config, location, |store| {
        store.set_record(year, month, day, cmd.amount)?;
        Ok(store.location().to_string())
    })
    .with_context(|| format!("recording rainfall for {location}"))?;

    println!(
        "Recorded {:.2} in for {}-{:02}-{:02} at {}",
        cmd.amount,
        year,
        month,
        day + 1,
        name
    );
    Ok(())
}

fn handle_show(config: &Config, location: &str, cmd: &ShowCommand) -> anyhow::Result<()> {
    RecordStore::with(config, location, |store| {
        let entries = store
            .series()
            .iter()
            .filter(|(year, _, _)| cmd.year.map_or(true, |y| y == *year));

        if cmd.json {
            let records: Vec<_> = entries
                .map(|(year, month, days)| {
                    serde_json::json!({ "year": year, "month": month, "days": days })
                })
                .collect();
            let doc = serde_json::json!({
                "location": store.location(),
                "records": records,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        } else {
            for (year, month, days) in entries {
                println!("{}", text::format_line(year, month, days));
            }
        }
        Ok(())
    })
    .with_context(|| format!("showing records for {location}"))
}

fn handle_summary(config: &Config, location: &str) -> anyhow::Result<()> {
    let path = RecordStore::with(config, location, |store| summary::write_summary(store))
        .with_context(|| format!("writing summary for {location}"))?;
    println!("{}", path.display());
    Ok(())
}

fn handle_paths(config: &Config, location: &str) -> anyhow::Result<()> {
    let location = normalize_location(location)?;
    let paths = StorePaths::new(&config.data_dir(), &location);

    println!("Location:   {location}");
    println!("Snapshot:   {}", paths.snapshot.display());
    println!("Records:    {}", paths.records.display());
    println!("Backup:     {}", paths.backup.display());
    println!("Summary:    {}", paths.summary.display());
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!("  Backup on save:     {}", config.storage.backup);
                println!(
                    "  Default location:   {}",
                    config.storage.default_location.as_deref().unwrap_or("(none)")
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.clone().unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path.clone())) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Err(e).with_context(|| format!("validating {}", path.display()));
                }
            }
        }
    }
    Ok(())
}
