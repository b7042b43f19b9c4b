use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::RatesConfig;
use crate::error::ReconError;

/// Level → hourly rate.
pub type LevelRateMap = HashMap<String, f64>;

/// Resolve the hourly rate for `level` on `date`.
///
/// `rates_after` applies from `cutover` onwards (inclusive) only when both are
/// given; otherwise `rates` is always used. `name` is carried into the error
/// for context only.
pub fn resolve(
    level: &str,
    date: NaiveDate,
    name: &str,
    rates: &LevelRateMap,
    rates_after: Option<&LevelRateMap>,
    cutover: Option<NaiveDate>,
) -> Result<f64, ReconError> {
    let table = match (rates_after, cutover) {
        (Some(after), Some(cutover)) if date >= cutover => after,
        _ => rates,
    };

    table.get(level).copied().ok_or_else(|| ReconError::UnknownLevel {
        level: level.to_string(),
        name: name.to_string(),
        date,
    })
}

/// A [`RatesConfig`] with its cutover date parsed once, ready for per-cell
/// lookups.
#[derive(Debug, Clone, Copy)]
pub struct RateResolver<'a> {
    rates: &'a LevelRateMap,
    rates_after: Option<&'a LevelRateMap>,
    cutover: Option<NaiveDate>,
}

impl<'a> RateResolver<'a> {
    pub fn new(config: &'a RatesConfig) -> Result<Self, ReconError> {
        Ok(Self {
            rates: &config.rates,
            rates_after: config.rates_after.as_ref(),
            cutover: config.cutover()?,
        })
    }

    pub fn resolve(&self, level: &str, date: NaiveDate, name: &str) -> Result<f64, ReconError> {
        resolve(level, date, name, self.rates, self.rates_after, self.cutover)
    }
}
