// Spreadsheet I/O for timesheet reconciliation

pub mod combine;
pub mod csv;
pub mod xlsx;

use std::path::Path;

use timecheck_recon::NamedTable;

/// Load the sign-in table: a CSV export, or one sheet of a workbook.
/// With no sheet name the first sheet is used.
pub fn load_sign_in(path: &Path, sheet: Option<&str>) -> Result<NamedTable, String> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("tsv"));

    match (is_csv, sheet) {
        (true, _) => csv::read_table(path),
        (false, Some(name)) => xlsx::read_sheet(path, name),
        (false, None) => xlsx::read_first_sheet(path),
    }
}
