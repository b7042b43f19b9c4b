//! Plain-text rendering of a reconciliation report.

use std::fmt::Write;

use timecheck_recon::{Discrepancy, ReconReport, ReconSummary};

/// Report as the lines a payroll clerk reads: a verdict, then one line per
/// discrepancy in engine order.
pub fn render_report(report: &ReconReport) -> String {
    let mut out = String::new();

    if report.discrepancies.is_empty() {
        out.push_str("No mismatches found.\n");
        return out;
    }

    out.push_str("Mismatches found:\n");
    for d in &report.discrepancies {
        let _ = writeln!(out, "{d}");
        if let Discrepancy::InvalidName { known_names, .. } = d {
            let _ = writeln!(out, "Names in sign in sheet are: {}", known_names.join(", "));
        }
    }
    out
}

/// One-line count summary for stderr.
pub fn summary_line(report: &ReconReport) -> String {
    let ReconSummary {
        total,
        empty_timesheets,
        invalid_names,
        timesheet_extra_entries,
        sign_in_extra_entries,
    } = &report.summary;

    let month = report
        .meta
        .month
        .as_deref()
        .map(|m| format!(" against '{m}'"))
        .unwrap_or_default();

    format!(
        "{} timesheet(s){}: {} mismatches ({} empty, {} unknown names, {} extra in timesheets, {} extra in sign-in)",
        report.meta.timesheets,
        month,
        total,
        empty_timesheets,
        invalid_names,
        timesheet_extra_entries,
        sign_in_extra_entries,
    )
}
