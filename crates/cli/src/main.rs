// timecheck CLI - reconcile coach timesheets against the pool sign-in sheet

mod check;
mod combine;
mod exit_codes;
mod logging;
mod rates;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use timecheck_config::Settings;
use timecheck_recon::ReconError;

use exit_codes::{recon_exit_code, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use rates::RatesCommands;

#[derive(Parser)]
#[command(name = "timecheck")]
#[command(about = "Check coach timesheets against the sign-in sheet")]
#[command(version)]
struct Cli {
    /// Log more to stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file to use instead of the one in the user config directory
    #[arg(long, env = "TIMECHECK_SETTINGS", global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a timesheets workbook against one month of the sign-in sheet
    #[command(after_help = "\
Examples:
  timecheck check timesheets_excel.xlsx sign_in.xlsx --month July --rates club.rates.toml
  timecheck check timesheets_excel.xlsx july.csv --rates club.rates.toml --json
  timecheck check timesheets_excel.xlsx sign_in.xlsx --output july-report.json

Exit codes:
  0  no mismatches
  1  mismatches found
  3  a sheet could not be read (missing/ambiguous hours, unknown level, ...)
  4  invalid rates file")]
    Check {
        /// Workbook with one timesheet per sheet
        timesheets: PathBuf,

        /// Sign-in workbook (one sheet per month) or a CSV export of one month
        sign_in: PathBuf,

        /// Sign-in sheet to read (default: "signIn.month" setting, else the first sheet)
        #[arg(long, short = 'm')]
        month: Option<String>,

        /// Rates file (default: "rates.file" setting)
        #[arg(long, short = 'r', value_name = "FILE")]
        rates: Option<PathBuf>,

        /// Print the report as JSON on stdout instead of text
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Combine a folder of timesheet workbooks into one workbook, one sheet per file
    #[command(after_help = "\
Examples:
  timecheck combine timesheets/
  timecheck combine timesheets/ --output july_timesheets.xlsx")]
    Combine {
        /// Folder containing one .xlsx timesheet per coach
        folder: PathBuf,

        /// Output workbook (default: "combine.outputFile" setting)
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Inspect a rates file
    #[command(subcommand)]
    Rates(RatesCommands),
}

/// Error carried back to `main`: exit code, message, optional hint.
/// An empty message prints nothing (used when the output already says it).
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Exit with `code` and no message.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Create error from an engine error with the matching exit code.
    pub fn recon(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::InvalidDateFormat { .. } => {
                Some("write rate_change_date as DD/MM/YYYY, e.g. \"01/09/2024\"".to_string())
            }
            ReconError::UnknownLevel { .. } => {
                Some("add the level to [rates] (and [rates_after]) in the rates file".to_string())
            }
            ReconError::MissingHours { .. } | ReconError::AmbiguousHours { .. } => {
                Some("each timesheet row needs exactly one hours column filled in".to_string())
            }
            ReconError::MalformedTable { .. } => {
                Some("check the [timesheet] / [sign_in] layout in the rates file".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let (settings, settings_path) = match cli.settings {
        Some(path) => (Settings::load_from(&path), path),
        None => (Settings::load(), Settings::config_path()),
    };

    let result = match cli.command {
        Commands::Check { timesheets, sign_in, month, rates, json, output } => {
            let args = check::CheckArgs { timesheets, sign_in, month, rates, json, output };
            check::cmd_check(args, &settings, &settings_path)
        }
        Commands::Combine { folder, output } => combine::cmd_combine(folder, output, &settings),
        Commands::Rates(command) => rates::cmd_rates(command),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
