use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One (date, hours, rate) claim. Equality, hashing and ordering all use the
/// exact triple; there is no tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Entry {
    date: NaiveDate,
    hours: OrderedFloat<f64>,
    rate: OrderedFloat<f64>,
}

impl Entry {
    pub fn new(date: NaiveDate, hours: f64, rate: f64) -> Self {
        Self {
            date,
            hours: OrderedFloat(hours),
            rate: OrderedFloat(rate),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hours(&self) -> f64 {
        self.hours.into_inner()
    }

    pub fn rate(&self) -> f64 {
        self.rate.into_inner()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hours on {} at {}/hour",
            self.hours(),
            self.date.format("%d/%m/%Y"),
            self.rate()
        )
    }
}

// ---------------------------------------------------------------------------
// Sign-in log
// ---------------------------------------------------------------------------

/// Sign-in entries per worker. Remembers the order in which workers first
/// appear in the source sheet so leftovers are reported reproducibly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignInLog {
    order: Vec<String>,
    entries: HashMap<String, BTreeSet<Entry>>,
}

impl SignInLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry for `name`. Returns false if an identical entry was
    /// already recorded for that worker.
    pub fn insert(&mut self, name: &str, entry: Entry) -> bool {
        if !self.entries.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.entries.entry(name.to_string()).or_default().insert(entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&BTreeSet<Entry>> {
        self.entries.get(name)
    }

    /// Worker names in first-appearance order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn worker_count(&self) -> usize {
        self.order.len()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.values().map(|s| s.len()).sum()
    }

    /// Workers and their entries in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Entry>)> {
        self.order
            .iter()
            .filter_map(|n| self.entries.get(n).map(|s| (n.as_str(), s)))
    }
}

// ---------------------------------------------------------------------------
// Discrepancies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discrepancy {
    /// Timesheet sheet with no data.
    EmptyTimesheet { sheet_name: String },
    /// Timesheet name not found among sign-in names.
    InvalidName { name: String, known_names: Vec<String> },
    /// Declared on a timesheet, not corroborated by the sign-in log.
    TimesheetExtraEntry { name: String, entry: Entry },
    /// Recorded in the sign-in log, claimed by no timesheet.
    SignInExtraEntry { name: String, entry: Entry },
}

impl Discrepancy {
    pub fn kind(&self) -> DiscrepancyKind {
        match self {
            Self::EmptyTimesheet { .. } => DiscrepancyKind::EmptyTimesheet,
            Self::InvalidName { .. } => DiscrepancyKind::InvalidName,
            Self::TimesheetExtraEntry { .. } => DiscrepancyKind::TimesheetExtraEntry,
            Self::SignInExtraEntry { .. } => DiscrepancyKind::SignInExtraEntry,
        }
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTimesheet { sheet_name } => write!(f, "Empty timesheet: {sheet_name}"),
            Self::InvalidName { name, .. } => write!(f, "Invalid name in timesheet: {name}"),
            Self::TimesheetExtraEntry { name, entry } => {
                write!(f, "Extra entry in timesheet for {name}: {entry}")
            }
            Self::SignInExtraEntry { name, entry } => {
                write!(f, "Extra entry in sign in sheet for {name}: {entry}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    EmptyTimesheet,
    InvalidName,
    TimesheetExtraEntry,
    SignInExtraEntry,
}

impl fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTimesheet => write!(f, "empty_timesheet"),
            Self::InvalidName => write!(f, "invalid_name"),
            Self::TimesheetExtraEntry => write!(f, "timesheet_extra_entry"),
            Self::SignInExtraEntry => write!(f, "sign_in_extra_entry"),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconSummary {
    pub total: usize,
    pub empty_timesheets: usize,
    pub invalid_names: usize,
    pub timesheet_extra_entries: usize,
    pub sign_in_extra_entries: usize,
}

impl ReconSummary {
    pub fn is_clean(&self) -> bool {
        self.total == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub discrepancies: Vec<Discrepancy>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    pub timesheets: usize,
    pub workers: usize,
    pub sign_in_entries: usize,
    pub engine_version: String,
    pub run_at: String,
}
