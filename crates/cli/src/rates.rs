//! `timecheck rates`: validate a rates file, look up one rate.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Subcommand;
use serde::Serialize;
use timecheck_recon::config::RATE_CHANGE_DATE_FORMAT;
use timecheck_recon::rates::RateResolver;
use timecheck_recon::{RatesConfig, ReconError};

use crate::CliError;

#[derive(Subcommand)]
pub enum RatesCommands {
    /// Parse and validate a rates file without running a check
    #[command(after_help = "\
Examples:
  timecheck rates validate club.rates.toml")]
    Validate {
        /// Path to the .rates.toml file
        file: PathBuf,
    },

    /// Show the hourly rate for a level on a date
    #[command(after_help = "\
Examples:
  timecheck rates show club.rates.toml --level L2 --date 01/09/2024
  timecheck rates show club.rates.toml --level L2 --date 31/08/2024 --json")]
    Show {
        /// Path to the .rates.toml file
        file: PathBuf,

        /// Level as written in the sign-in sheet
        #[arg(long, short = 'l')]
        level: String,

        /// Date, DD/MM/YYYY
        #[arg(long, short = 'd')]
        date: String,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct RateLookup<'a> {
    level: &'a str,
    date: NaiveDate,
    rate: f64,
    after_cutover: bool,
}

pub fn cmd_rates(cmd: RatesCommands) -> Result<(), CliError> {
    match cmd {
        RatesCommands::Validate { file } => cmd_rates_validate(&file),
        RatesCommands::Show { file, level, date, json } => cmd_rates_show(&file, &level, &date, json),
    }
}

/// Read, parse and validate a rates file.
pub fn load_rates(path: &Path) -> Result<RatesConfig, CliError> {
    let toml = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read rates file {}: {e}", path.display())))?;

    RatesConfig::from_toml(&toml).map_err(|e| {
        let mut err = CliError::recon(e);
        err.message = format!("{}: {}", path.display(), err.message);
        err
    })
}

fn cmd_rates_validate(path: &Path) -> Result<(), CliError> {
    let config = load_rates(path)?;

    let mut levels: Vec<&str> = config.rates.keys().map(String::as_str).collect();
    levels.sort_unstable();
    println!("{}: ok", path.display());
    println!("  levels: {}", levels.join(", "));

    match (config.cutover().map_err(CliError::recon)?, &config.rates_after) {
        (Some(cutover), Some(after)) => println!(
            "  rate change on {} ({} level(s) in [rates_after])",
            cutover.format(RATE_CHANGE_DATE_FORMAT),
            after.len()
        ),
        _ => println!("  no rate change"),
    }
    println!("  hours columns: {}", config.timesheet.hour_columns.join(", "));
    Ok(())
}

fn cmd_rates_show(path: &Path, level: &str, date: &str, json: bool) -> Result<(), CliError> {
    let config = load_rates(path)?;

    let date = NaiveDate::parse_from_str(date.trim(), RATE_CHANGE_DATE_FORMAT).map_err(|_| {
        CliError::usage(format!("invalid date '{date}'")).with_hint("use DD/MM/YYYY, e.g. 01/09/2024")
    })?;

    let resolver = RateResolver::new(&config).map_err(CliError::recon)?;
    let rate = resolver.resolve(level, date, "").map_err(|e| match e {
        ReconError::UnknownLevel { level, .. } => {
            let mut known: Vec<&str> = config.rates.keys().map(String::as_str).collect();
            known.sort_unstable();
            CliError::usage(format!("level '{level}' is not in the rate table"))
                .with_hint(format!("known levels: {}", known.join(", ")))
        }
        other => CliError::recon(other),
    })?;

    let after_cutover = matches!(
        (config.cutover().map_err(CliError::recon)?, &config.rates_after),
        (Some(cutover), Some(_)) if date >= cutover
    );

    if json {
        let lookup = RateLookup { level, date, rate, after_cutover };
        let json_str = serde_json::to_string_pretty(&lookup)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        println!("{rate}");
    }
    Ok(())
}
