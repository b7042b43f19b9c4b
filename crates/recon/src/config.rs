use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ReconError;
use crate::table::CellRef;

/// Format of `rate_change_date`.
pub const RATE_CHANGE_DATE_FORMAT: &str = "%d/%m/%Y";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Rate table plus optional layout overrides, loaded once per run from a
/// `.rates.toml` file and read-only afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatesConfig {
    pub rates: HashMap<String, f64>,
    #[serde(default)]
    pub rates_after: Option<HashMap<String, f64>>,
    /// Cutover date, `DD/MM/YYYY`. Kept as the raw string so a malformed
    /// value surfaces as `InvalidDateFormat`, not a generic parse error.
    #[serde(default)]
    pub rate_change_date: Option<String>,
    #[serde(default)]
    pub timesheet: TimesheetLayout,
    #[serde(default)]
    pub sign_in: SignInLayout,
}

// ---------------------------------------------------------------------------
// Timesheet layout
// ---------------------------------------------------------------------------

/// Where things live on a timesheet. Name cells are fixed positions; the
/// data table is found by scanning the first column for `marker`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimesheetLayout {
    pub first_name_cell: String,
    pub last_name_cell: String,
    pub marker: String,
    pub date_column: String,
    pub weekday_column: String,
    pub rate_column: String,
    /// Mutually exclusive hour categories, in the order they are checked.
    pub hour_columns: Vec<String>,
}

impl Default for TimesheetLayout {
    fn default() -> Self {
        Self {
            first_name_cell: "D5".into(),
            last_name_cell: "D6".into(),
            marker: "Date".into(),
            date_column: "Date".into(),
            weekday_column: "Week".into(),
            rate_column: "Rate of pay".into(),
            hour_columns: [
                "Masters",
                "NP",
                "Chiswick",
                "Sh. Bush",
                "Acton",
                "Water",
                "Horsenden",
                "St Helen's",
                "Disability",
                "Squad",
                "Admin",
                "Safeguarding",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl TimesheetLayout {
    pub fn first_name_ref(&self) -> Result<CellRef, ReconError> {
        parse_cell_ref("timesheet.first_name_cell", &self.first_name_cell)
    }

    pub fn last_name_ref(&self) -> Result<CellRef, ReconError> {
        parse_cell_ref("timesheet.last_name_cell", &self.last_name_cell)
    }
}

// ---------------------------------------------------------------------------
// Sign-in layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignInLayout {
    pub name_column: String,
    pub level_column: String,
    /// 0-indexed column where the per-date columns start.
    pub first_date_column: usize,
    /// Levels marking summary/subtotal rows.
    pub skip_levels: Vec<String>,
}

impl Default for SignInLayout {
    fn default() -> Self {
        Self {
            name_column: "Name".into(),
            level_column: "Level".into(),
            first_date_column: 3,
            skip_levels: vec!["LHC".into()],
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RatesConfig {
    /// Flat rate table with default layouts and no cutover.
    pub fn flat(rates: HashMap<String, f64>) -> Self {
        Self {
            rates,
            rates_after: None,
            rate_change_date: None,
            timesheet: TimesheetLayout::default(),
            sign_in: SignInLayout::default(),
        }
    }

    /// Rate table that switches to `rates_after` on `rate_change_date`
    /// (`DD/MM/YYYY`).
    pub fn with_cutover(
        rates: HashMap<String, f64>,
        rates_after: HashMap<String, f64>,
        rate_change_date: &str,
    ) -> Self {
        Self {
            rates_after: Some(rates_after),
            rate_change_date: Some(rate_change_date.to_string()),
            ..Self::flat(rates)
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: RatesConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parsed cutover date, if one is configured.
    pub fn cutover(&self) -> Result<Option<NaiveDate>, ReconError> {
        self.rate_change_date
            .as_deref()
            .map(parse_rate_change_date)
            .transpose()
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.rates.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one level is required in [rates]".into(),
            ));
        }

        check_rates("rates", &self.rates)?;
        if let Some(ref after) = self.rates_after {
            check_rates("rates_after", after)?;
        }

        self.cutover()?;

        match (&self.rates_after, &self.rate_change_date) {
            (Some(_), None) => {
                log::warn!("[rates_after] given without rate_change_date; it will be ignored")
            }
            (None, Some(date)) => {
                log::warn!("rate_change_date {date} given without [rates_after]; it will be ignored")
            }
            _ => {}
        }

        self.timesheet.first_name_ref()?;
        self.timesheet.last_name_ref()?;

        if self.timesheet.hour_columns.is_empty() {
            return Err(ReconError::ConfigValidation(
                "timesheet.hour_columns must list at least one column".into(),
            ));
        }
        if self.timesheet.marker.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "timesheet.marker must not be empty".into(),
            ));
        }
        if self.sign_in.name_column == self.sign_in.level_column {
            return Err(ReconError::ConfigValidation(
                "sign_in.name_column and sign_in.level_column must differ".into(),
            ));
        }

        Ok(())
    }
}

/// Parse a `DD/MM/YYYY` rate-change date.
pub fn parse_rate_change_date(value: &str) -> Result<NaiveDate, ReconError> {
    NaiveDate::parse_from_str(value.trim(), RATE_CHANGE_DATE_FORMAT).map_err(|_| {
        ReconError::InvalidDateFormat {
            value: value.to_string(),
        }
    })
}

fn check_rates(table: &str, rates: &HashMap<String, f64>) -> Result<(), ReconError> {
    for (level, rate) in rates {
        if !rate.is_finite() || *rate < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "[{table}] level '{level}': rate must be a non-negative number, got {rate}"
            )));
        }
    }
    Ok(())
}

fn parse_cell_ref(field: &str, value: &str) -> Result<CellRef, ReconError> {
    CellRef::parse(value).ok_or_else(|| {
        ReconError::ConfigValidation(format!("{field}: '{value}' is not a cell reference like D5"))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
