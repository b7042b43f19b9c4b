use crate::model::{Discrepancy, DiscrepancyKind, ReconSummary};

/// Compute summary counts from a discrepancy list.
pub fn compute_summary(discrepancies: &[Discrepancy]) -> ReconSummary {
    let mut summary = ReconSummary {
        total: discrepancies.len(),
        ..ReconSummary::default()
    };

    for d in discrepancies {
        match d.kind() {
            DiscrepancyKind::EmptyTimesheet => summary.empty_timesheets += 1,
            DiscrepancyKind::InvalidName => summary.invalid_names += 1,
            DiscrepancyKind::TimesheetExtraEntry => summary.timesheet_extra_entries += 1,
            DiscrepancyKind::SignInExtraEntry => summary.sign_in_extra_entries += 1,
        }
    }

    summary
}
