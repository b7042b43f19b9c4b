// Excel import/export (xlsx, xls, xlsb, ods via calamine; xlsx out via rust_xlsxwriter)

use std::io::{Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use timecheck_recon::{Cell, NamedTable, Table};

/// Days from 0001-01-01 (CE day 1) to 1899-12-30, serial zero of the 1900
/// date system that rust_xlsxwriter writes.
const EXCEL_EPOCH_CE_DAYS: i32 = 693_594;

/// Number format applied to dates on export; calamine reads it back as a date.
const DATE_FORMAT: &str = "dd/mm/yyyy";

// ============================================================================
// Import
// ============================================================================

/// Read every sheet of a workbook, in workbook order.
pub fn read_workbook(path: &Path) -> Result<Vec<NamedTable>, String> {
    let mut workbook = open(path)?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    if sheet_names.is_empty() {
        return Err(format!("{} contains no sheets", path.display()));
    }

    let tables = sheet_names
        .iter()
        .map(|name| read_range(&mut workbook, name))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!("read {} sheet(s) from {}", tables.len(), path.display());
    Ok(tables)
}

/// Read one named sheet. A missing sheet lists the ones that do exist.
pub fn read_sheet(path: &Path, name: &str) -> Result<NamedTable, String> {
    let mut workbook = open(path)?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    if !sheet_names.iter().any(|s| s == name) {
        return Err(format!(
            "Sheet '{}' not found in {}. Available sheets: {}",
            name,
            path.display(),
            sheet_names.join(", ")
        ));
    }

    read_range(&mut workbook, name)
}

/// Read the first sheet of a workbook (the one a bare `read_excel` would pick).
pub fn read_first_sheet(path: &Path) -> Result<NamedTable, String> {
    let mut workbook = open(path)?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| format!("{} contains no sheets", path.display()))?;

    read_range(&mut workbook, &first)
}

fn open(path: &Path) -> Result<Sheets<std::io::BufReader<std::fs::File>>, String> {
    open_workbook_auto(path).map_err(|e| format!("Failed to open {}: {}", path.display(), e))
}

fn read_range<RS: Read + Seek>(workbook: &mut Sheets<RS>, name: &str) -> Result<NamedTable, String> {
    let range = workbook
        .worksheet_range(name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", name, e))?;

    let table = range_to_table(&range);
    log::debug!(
        "sheet '{}': {} rows x {} cols",
        name,
        table.height(),
        table.width()
    );
    Ok(NamedTable::new(name, table))
}

/// Convert a calamine range into a grid anchored at A1.
///
/// calamine trims leading empty rows and columns; fixed cell offsets such as
/// a name in D5 only mean something if those are put back.
fn range_to_table(range: &Range<Data>) -> Table {
    let Some((start_row, start_col)) = range.start() else {
        return Table::default();
    };

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col as usize];
        cells.extend(row.iter().map(convert));
        rows.push(cells);
    }

    Table::new(rows)
}

fn convert(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if serial < 1.0 {
                // Time of day only (start/end columns)
                Cell::Number(serial)
            } else {
                // as_datetime honours the workbook's 1900/1904 date system
                dt.as_datetime()
                    .map_or(Cell::Number(serial), |t| Cell::Date(t.date()))
            }
        }
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map_or_else(|| Cell::Text(s.clone()), Cell::Date),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Calendar date to an Excel serial (1900 system).
pub fn date_to_serial(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce() - EXCEL_EPOCH_CE_DAYS)
}

// ============================================================================
// Export
// ============================================================================

/// Result of writing tables to a workbook
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WriteResult {
    pub sheets_written: usize,
    pub cells_written: usize,
}

/// Write each table to its own sheet, values only. Dates get a `dd/mm/yyyy`
/// number format so they read back as dates.
pub fn write_tables(path: &Path, tables: &[NamedTable]) -> Result<WriteResult, String> {
    let mut xlsx_workbook = XlsxWorkbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let mut result = WriteResult::default();

    for table in tables {
        let worksheet = xlsx_workbook
            .add_worksheet()
            .set_name(&table.name)
            .map_err(|e| format!("Failed to create sheet '{}': {}", table.name, e))?;

        result.cells_written += write_cells(worksheet, &table.table, &date_format)?;
        result.sheets_written += 1;
    }

    xlsx_workbook
        .save(path)
        .map_err(|e| format!("Failed to save {}: {}", path.display(), e))?;

    log::info!(
        "wrote {} sheet(s), {} cells to {}",
        result.sheets_written,
        result.cells_written,
        path.display()
    );
    Ok(result)
}

fn write_cells(worksheet: &mut Worksheet, table: &Table, date_format: &Format) -> Result<usize, String> {
    let mut written = 0;

    for row in 0..table.height() {
        for (col, cell) in table.row(row).iter().enumerate() {
            let (row32, col16) = match (u32::try_from(row), u16::try_from(col)) {
                (Ok(r), Ok(c)) => (r, c),
                _ => return Err(format!("Failed to write cell ({}, {}): out of sheet bounds", row, col)),
            };
            let outcome = match cell {
                Cell::Empty => continue,
                Cell::Text(s) => worksheet.write_string(row32, col16, s).map(|_| ()),
                Cell::Number(n) => worksheet.write_number(row32, col16, *n).map(|_| ()),
                Cell::Date(d) => worksheet
                    .write_number_with_format(row32, col16, date_to_serial(*d), date_format)
                    .map(|_| ()),
            };
            outcome.map_err(|e| format!("Failed to write cell ({}, {}): {}", row, col, e))?;
            written += 1;
        }
    }

    Ok(written)
}
