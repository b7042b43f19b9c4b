//! `timecheck check`: one reconciliation run.

use std::path::{Path, PathBuf};

use timecheck_config::Settings;

use crate::exit_codes::EXIT_DISCREPANCIES;
use crate::rates::load_rates;
use crate::render::{render_report, summary_line};
use crate::CliError;

pub struct CheckArgs {
    pub timesheets: PathBuf,
    pub sign_in: PathBuf,
    pub month: Option<String>,
    pub rates: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
}

pub fn cmd_check(args: CheckArgs, settings: &Settings, settings_path: &Path) -> Result<(), CliError> {
    // Flags win over settings
    let rates_path = args
        .rates
        .or_else(|| settings.rates_file.clone())
        .ok_or_else(|| {
            CliError::usage("no rates file given").with_hint(format!(
                "pass --rates FILE or set \"rates.file\" in {}",
                settings_path.display()
            ))
        })?;
    let month = args.month.or_else(|| settings.sign_in_month.clone());

    let config = load_rates(&rates_path)?;

    let timesheets = timecheck_io::xlsx::read_workbook(&args.timesheets).map_err(CliError::io)?;
    let sign_in = timecheck_io::load_sign_in(&args.sign_in, month.as_deref()).map_err(CliError::io)?;
    log::info!(
        "{} timesheet sheet(s) from {}, sign-in sheet '{}' from {}",
        timesheets.len(),
        args.timesheets.display(),
        sign_in.name,
        args.sign_in.display()
    );

    let report = timecheck_recon::run(&timesheets, &sign_in, &config).map_err(CliError::recon)?;

    if args.json || args.output.is_some() {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = args.output {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
            eprintln!("wrote {}", path.display());
        }
        if args.json {
            println!("{json_str}");
        }
    }

    if !args.json {
        print!("{}", render_report(&report));
    }

    eprintln!("{}", summary_line(&report));

    if report.summary.is_clean() {
        Ok(())
    } else {
        Err(CliError::silent(EXIT_DISCREPANCIES))
    }
}
