// User settings (settings.json under the platform config directory)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Workbook name the combine command writes when none is given
pub const DEFAULT_COMBINED_FILE: &str = "timesheets_excel.xlsx";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Rates
    #[serde(rename = "rates.file")]
    pub rates_file: Option<PathBuf>,

    // Sign-in
    #[serde(rename = "signIn.month")]
    pub sign_in_month: Option<String>,

    // Combine
    #[serde(rename = "combine.outputFile")]
    pub combine_output_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rates_file: None,
            sign_in_month: None,
            combine_output_file: DEFAULT_COMBINED_FILE.to_string(),
        }
    }
}

const DEFAULT_FILE: &str = r#"{
    // Rate table used by `timecheck check` when --rates is not given
    "rates.file": null,

    // Sign-in sheet (month) to read when --month is not given.
    // null = first sheet in the workbook
    "signIn.month": null,

    // Workbook written by `timecheck combine` when --output is not given
    "combine.outputFile": "timesheets_excel.xlsx"
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("timecheck");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults. A commented
    /// default file is written the first time.
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            Self::create_default_file(&path);
            return Self::default();
        }

        Self::load_from(&path)
    }

    /// Load settings from a specific file. Read or parse errors are logged
    /// and give the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                log::warn!("Error parsing {}: {}; using default settings", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON, ignoring lines that start with `//`.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned)
    }

    fn create_default_file(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        if let Err(e) = fs::write(path, DEFAULT_FILE) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }
}
