//! Timesheet parsing: one sheet, one worker, an ordered list of claims.

use crate::config::TimesheetLayout;
use crate::error::ReconError;
use crate::model::Entry;
use crate::table::{Cell, CellRef, HeaderIndex, Table};

/// A parsed timesheet. Entries keep table order; duplicates are allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct Timesheet {
    pub name: String,
    pub entries: Vec<Entry>,
}

/// Join trimmed first and last names with a single space.
pub fn normalize_name(first: &str, last: &str) -> String {
    match (first.trim(), last.trim()) {
        (f, "") => f.to_string(),
        ("", l) => l.to_string(),
        (f, l) => format!("{f} {l}"),
    }
}

/// Parse one timesheet sheet.
pub fn parse(sheet: &str, table: &Table, layout: &TimesheetLayout) -> Result<Timesheet, ReconError> {
    let first = table.at(layout.first_name_ref()?).trimmed();
    let last = table.at(layout.last_name_ref()?).trimmed();
    let name = normalize_name(&first, &last);

    let marker_row = find_marker_row(table, &layout.marker).ok_or_else(|| {
        ReconError::MalformedTable {
            sheet: sheet.to_string(),
            reason: format!("no '{}' marker found in column A", layout.marker),
        }
    })?;

    let columns = HeaderIndex::new(table.row(marker_row));
    let date_col = columns.require(sheet, &layout.date_column)?;
    let weekday_col = columns.require(sheet, &layout.weekday_column)?;
    let rate_col = columns.require(sheet, &layout.rate_column)?;

    let hour_cols: Vec<(&str, usize)> = layout
        .hour_columns
        .iter()
        .filter_map(|h| match columns.find(h) {
            Some(col) => Some((h.as_str(), col)),
            None => {
                log::debug!("sheet '{sheet}': hours column '{h}' not present");
                None
            }
        })
        .collect();
    if hour_cols.is_empty() {
        return Err(ReconError::MalformedTable {
            sheet: sheet.to_string(),
            reason: "none of the configured hours columns are present".into(),
        });
    }

    let mut entries = Vec::new();
    for row in (marker_row + 1)..table.height() {
        let date_cell = table.get(row, date_col);
        if date_cell.is_empty() || table.get(row, weekday_col).is_empty() {
            log::debug!("sheet '{sheet}': skipping row {} (no date or weekday)", row + 1);
            continue;
        }

        let date = date_cell
            .as_date()
            .ok_or_else(|| invalid(sheet, row, date_col, "a date", date_cell))?;

        let filled: Vec<(&str, usize)> = hour_cols
            .iter()
            .copied()
            .filter(|&(_, col)| !table.get(row, col).is_empty())
            .collect();

        let hours_col = match filled.as_slice() {
            [] => {
                return Err(ReconError::MissingHours { name, date });
            }
            [(_, col)] => *col,
            many => {
                return Err(ReconError::AmbiguousHours {
                    name,
                    date,
                    columns: many.iter().map(|(h, _)| h.to_string()).collect(),
                });
            }
        };

        let hours_cell = table.get(row, hours_col);
        let hours = hours_cell
            .as_number()
            .filter(|h| *h >= 0.0)
            .ok_or_else(|| invalid(sheet, row, hours_col, "a non-negative number of hours", hours_cell))?;

        let rate_cell = table.get(row, rate_col);
        let rate = rate_cell
            .as_number()
            .ok_or_else(|| invalid(sheet, row, rate_col, "a rate of pay", rate_cell))?;

        entries.push(Entry::new(date, hours, rate));
    }

    log::debug!("sheet '{sheet}': {} entries for '{name}'", entries.len());
    Ok(Timesheet { name, entries })
}

fn find_marker_row(table: &Table, marker: &str) -> Option<usize> {
    (0..table.height()).find(|&row| {
        table
            .get(row, 0)
            .as_text()
            .is_some_and(|s| s.trim() == marker.trim())
    })
}

fn invalid(sheet: &str, row: usize, col: usize, expected: &'static str, cell: &Cell) -> ReconError {
    ReconError::InvalidValue {
        sheet: sheet.to_string(),
        cell: CellRef::new(row, col).to_string(),
        expected,
        value: cell.to_string(),
    }
}
