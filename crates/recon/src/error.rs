use std::fmt;

use chrono::NaiveDate;

/// Fatal errors. Any of these aborts the run; no partial discrepancy list is
/// produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty rate table, bad cell reference, etc.).
    ConfigValidation(String),
    /// Rate-change date is not `DD/MM/YYYY`.
    InvalidDateFormat { value: String },
    /// Sign-in row references a level absent from the active rate table.
    UnknownLevel { level: String, name: String, date: NaiveDate },
    /// Timesheet row with no hour-category column populated.
    MissingHours { name: String, date: NaiveDate },
    /// Timesheet row with more than one hour-category column populated.
    AmbiguousHours { name: String, date: NaiveDate, columns: Vec<String> },
    /// Expected table structure not found (missing "Date" marker, missing column).
    MalformedTable { sheet: String, reason: String },
    /// A cell that must hold a number or a date holds something else.
    InvalidValue { sheet: String, cell: String, expected: &'static str, value: String },
}

impl ReconError {
    /// True for faults in the source spreadsheets, as opposed to faults in
    /// the rate configuration.
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Self::UnknownLevel { .. }
                | Self::MissingHours { .. }
                | Self::AmbiguousHours { .. }
                | Self::MalformedTable { .. }
                | Self::InvalidValue { .. }
        )
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InvalidDateFormat { value } => write!(
                f,
                "rate change date '{value}' is in invalid format, it must be in DD/MM/YYYY format"
            ),
            Self::UnknownLevel { level, name, date } => write!(
                f,
                "unknown level '{level}' for {name} on {}",
                date.format("%d/%m/%Y")
            ),
            Self::MissingHours { name, date } => write!(
                f,
                "no hours given for {name} on {}",
                date.format("%d/%m/%Y")
            ),
            Self::AmbiguousHours { name, date, columns } => write!(
                f,
                "more than one hours column filled for {name} on {}: {}",
                date.format("%d/%m/%Y"),
                columns.join(", ")
            ),
            Self::MalformedTable { sheet, reason } => {
                write!(f, "sheet '{sheet}': {reason}")
            }
            Self::InvalidValue { sheet, cell, expected, value } => {
                write!(f, "sheet '{sheet}', cell {cell}: expected {expected}, found '{value}'")
            }
        }
    }
}

impl std::error::Error for ReconError {}
