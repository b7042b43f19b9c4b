//! `timecheck combine`: merge per-coach workbooks into one.

use std::path::PathBuf;

use timecheck_config::Settings;

use crate::CliError;

pub fn cmd_combine(folder: PathBuf, output: Option<PathBuf>, settings: &Settings) -> Result<(), CliError> {
    if !folder.is_dir() {
        return Err(CliError::usage(format!("{} is not a folder", folder.display())));
    }

    let output = output.unwrap_or_else(|| PathBuf::from(&settings.combine_output_file));
    let report = timecheck_io::combine::combine_timesheets(&folder, &output).map_err(CliError::io)?;

    for skipped in &report.skipped {
        eprintln!("skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    println!("{}.", report.summary());
    Ok(())
}
