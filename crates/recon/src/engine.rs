use std::collections::{BTreeSet, HashMap};

use crate::config::RatesConfig;
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::model::{Discrepancy, Entry, ReconMeta, ReconReport, SignInLog};
use crate::table::NamedTable;
use crate::{sign_in, timesheet};

/// Parse the sign-in sheet, reconcile every timesheet against it, and wrap
/// the discrepancies with a summary. Any data-integrity error aborts the run.
pub fn run(
    timesheets: &[NamedTable],
    sign_in_sheet: &NamedTable,
    config: &RatesConfig,
) -> Result<ReconReport, ReconError> {
    config.validate()?;

    let roster = sign_in::parse(&sign_in_sheet.name, &sign_in_sheet.table, config)?;
    let discrepancies = reconcile(timesheets, &roster, config)?;
    let summary = compute_summary(&discrepancies);

    log::info!(
        "checked {} timesheet(s) against '{}': {} discrepancies",
        timesheets.len(),
        sign_in_sheet.name,
        summary.total
    );

    Ok(ReconReport {
        meta: ReconMeta {
            month: Some(sign_in_sheet.name.clone()),
            timesheets: timesheets.len(),
            workers: roster.worker_count(),
            sign_in_entries: roster.entry_count(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        discrepancies,
    })
}

/// Match each timesheet's entries against the sign-in set for its worker.
///
/// Timesheet-side discrepancies come out in sheet order then row order;
/// sign-in leftovers follow, grouped by worker in first-appearance order and
/// by entry order within a worker. `sign_in` itself is left untouched: the
/// run consumes its own copy of each worker's set.
pub fn reconcile(
    timesheets: &[NamedTable],
    sign_in: &SignInLog,
    config: &RatesConfig,
) -> Result<Vec<Discrepancy>, ReconError> {
    let mut remaining: HashMap<&str, BTreeSet<Entry>> = sign_in
        .iter()
        .map(|(name, entries)| (name, entries.clone()))
        .collect();
    let mut discrepancies = Vec::new();

    for sheet in timesheets {
        if sheet.table.is_blank() {
            log::debug!("sheet '{}' is empty", sheet.name);
            discrepancies.push(Discrepancy::EmptyTimesheet {
                sheet_name: sheet.name.clone(),
            });
            continue;
        }

        let parsed = timesheet::parse(&sheet.name, &sheet.table, &config.timesheet)?;
        if parsed.entries.is_empty() {
            log::debug!("sheet '{}' has no data rows", sheet.name);
            discrepancies.push(Discrepancy::EmptyTimesheet {
                sheet_name: sheet.name.clone(),
            });
            continue;
        }

        let Some(bucket) = remaining.get_mut(parsed.name.as_str()) else {
            log::debug!("sheet '{}': no sign-in rows for '{}'", sheet.name, parsed.name);
            discrepancies.push(Discrepancy::InvalidName {
                name: parsed.name,
                known_names: sign_in.names().to_vec(),
            });
            continue;
        };

        let mut matched = 0usize;
        for entry in parsed.entries {
            if bucket.remove(&entry) {
                matched += 1;
            } else {
                discrepancies.push(Discrepancy::TimesheetExtraEntry {
                    name: parsed.name.clone(),
                    entry,
                });
            }
        }
        log::debug!("sheet '{}': {matched} entries matched for '{}'", sheet.name, parsed.name);
    }

    for name in sign_in.names() {
        let Some(left) = remaining.get(name.as_str()) else {
            continue;
        };
        discrepancies.extend(left.iter().map(|entry| Discrepancy::SignInExtraEntry {
            name: name.clone(),
            entry: *entry,
        }));
    }

    Ok(discrepancies)
}
