//! Sign-in log parsing: one sheet per month, one row per worker and level,
//! one column per calendar date.

use chrono::NaiveDate;

use crate::config::RatesConfig;
use crate::error::ReconError;
use crate::model::{Entry, SignInLog};
use crate::rates::RateResolver;
use crate::table::{col_to_letter, CellRef, HeaderIndex, Table};

/// Row holding the column headers (names, levels, dates).
const HEADER_ROW: usize = 0;

/// Parse a month's sign-in sheet into per-worker entry sets, resolving each
/// cell's rate from the worker's level and the column's date.
pub fn parse(sheet: &str, table: &Table, config: &RatesConfig) -> Result<SignInLog, ReconError> {
    let resolver = RateResolver::new(config)?;
    let layout = &config.sign_in;

    let header = table.row(HEADER_ROW);
    let columns = HeaderIndex::new(header);
    let name_col = columns.require(sheet, &layout.name_column)?;
    let level_col = columns.require(sheet, &layout.level_column)?;
    let date_cols = date_columns(sheet, table, layout.first_date_column)?;

    let mut roster = SignInLog::new();
    let mut duplicates = 0usize;

    for row in (HEADER_ROW + 1)..table.height() {
        let level_cell = table.get(row, level_col);
        let level = level_cell.trimmed();
        if level_cell.is_empty() || layout.skip_levels.iter().any(|s| s.trim() == level) {
            log::debug!("sheet '{sheet}': skipping row {} (level '{level}')", row + 1);
            continue;
        }

        let name_cell = table.get(row, name_col);
        if name_cell.is_empty() {
            return Err(ReconError::InvalidValue {
                sheet: sheet.to_string(),
                cell: CellRef::new(row, name_col).to_string(),
                expected: "a worker name",
                value: String::new(),
            });
        }
        // A worker is only known once they have at least one entry
        let name = name_cell.trimmed();

        for &(col, date) in &date_cols {
            let cell = table.get(row, col);
            if cell.is_empty() {
                continue;
            }

            let hours = cell.as_number().filter(|h| *h >= 0.0).ok_or_else(|| {
                ReconError::InvalidValue {
                    sheet: sheet.to_string(),
                    cell: CellRef::new(row, col).to_string(),
                    expected: "a non-negative number of hours",
                    value: cell.to_string(),
                }
            })?;
            let rate = resolver.resolve(&level, date, &name)?;

            if !roster.insert(&name, Entry::new(date, hours, rate)) {
                duplicates += 1;
                log::warn!(
                    "sheet '{sheet}': {name} has {hours} hours on {} twice at {rate}/hour; counted once",
                    date.format("%d/%m/%Y")
                );
            }
        }
    }

    log::info!(
        "sheet '{sheet}': {} sign-in entries for {} workers ({} duplicate cells)",
        roster.entry_count(),
        roster.worker_count(),
        duplicates
    );
    Ok(roster)
}

/// Date columns from `first` onwards. Columns with an empty header are
/// ignored; any other non-date header is a structural error.
fn date_columns(sheet: &str, table: &Table, first: usize) -> Result<Vec<(usize, NaiveDate)>, ReconError> {
    let header = table.row(HEADER_ROW);
    let mut cols = Vec::new();

    for (col, cell) in header.iter().enumerate().skip(first) {
        if cell.is_empty() {
            log::debug!("sheet '{sheet}': column {} has no header, ignored", col_to_letter(col));
            continue;
        }
        let date = cell.as_date().ok_or_else(|| ReconError::MalformedTable {
            sheet: sheet.to_string(),
            reason: format!(
                "column {} header '{cell}' is not a date",
                col_to_letter(col)
            ),
        })?;
        cols.push((col, date));
    }

    if cols.is_empty() {
        return Err(ReconError::MalformedTable {
            sheet: sheet.to_string(),
            reason: format!("no date columns from column {} onwards", col_to_letter(first)),
        });
    }

    Ok(cols)
}
