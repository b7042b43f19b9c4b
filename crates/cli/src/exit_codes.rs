//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: payroll scripts branch on them.
//!
//! | Code | Meaning                                                      |
//! |------|--------------------------------------------------------------|
//! | 0    | Success (no mismatches, config valid, combine written)       |
//! | 1    | Mismatches found between timesheets and the sign-in sheet    |
//! | 2    | Usage error (bad arguments, no rates file given)             |
//! | 3    | Data-integrity error in a spreadsheet; the run was aborted   |
//! | 4    | Invalid rate configuration                                   |
//! | 5    | I/O error (file missing, unreadable workbook, write failure) |

use timecheck_recon::ReconError;

/// Success - command completed, nothing to report.
pub const EXIT_SUCCESS: u8 = 0;

/// Mismatches found. Like `diff(1)`, exit 1 means "inputs differ."
pub const EXIT_DISCREPANCIES: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// A timesheet or sign-in row could not be interpreted (missing or
/// ambiguous hours, unknown level, malformed table, bad cell value).
/// No partial discrepancy list is produced.
pub const EXIT_DATA_INTEGRITY: u8 = 3;

/// The rates file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// File could not be opened, read or written.
pub const EXIT_IO: u8 = 5;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    if err.is_data_integrity() {
        EXIT_DATA_INTEGRITY
    } else {
        EXIT_INVALID_CONFIG
    }
}
