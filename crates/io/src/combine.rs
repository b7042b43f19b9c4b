// Combine a folder of per-worker timesheet workbooks into one workbook

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use timecheck_recon::NamedTable;

use crate::xlsx;

/// Excel's limit on sheet name length
const MAX_SHEET_NAME: usize = 31;

/// Characters Excel rejects in sheet names
const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// One source file that became a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedSheet {
    pub source: PathBuf,
    pub sheet_name: String,
}

/// A file that was left out, and why
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombineReport {
    pub output: PathBuf,
    pub sheets: Vec<CombinedSheet>,
    pub skipped: Vec<SkippedFile>,
    pub cells_written: usize,
}

impl CombineReport {
    pub fn summary(&self) -> String {
        let mut s = format!(
            "All timesheets have been combined into {} ({} sheet(s))",
            self.output.display(),
            self.sheets.len()
        );
        if !self.skipped.is_empty() {
            s.push_str(&format!(", {} file(s) skipped", self.skipped.len()));
        }
        s
    }
}

/// Copy the first sheet of every `.xlsx` file in `folder` into a new
/// workbook at `output`, one sheet per file named after the file stem.
///
/// Files are taken in name order. Office lock files (`~$*`) and the output
/// file itself are skipped, as are workbooks that fail to open. Values and
/// dates are copied; formatting is not. The first sheet is taken, not the one
/// that was active when the file was last saved (calamine does not expose
/// the active tab).
pub fn combine_timesheets(folder: &Path, output: &Path) -> Result<CombineReport, String> {
    let mut report = CombineReport {
        output: output.to_path_buf(),
        ..CombineReport::default()
    };

    let mut tables: Vec<NamedTable> = Vec::new();
    let mut used_names: HashSet<String> = HashSet::new();

    for path in list_workbooks(folder)? {
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        if file_name.starts_with("~$") {
            log::debug!("skipping lock file {}", path.display());
            report.skipped.push(SkippedFile {
                path,
                reason: "Office lock file".into(),
            });
            continue;
        }
        if is_same_file(&path, output) {
            log::debug!("skipping output file {}", path.display());
            continue;
        }

        let table = match xlsx::read_first_sheet(&path) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("skipping {}: {}", path.display(), e);
                report.skipped.push(SkippedFile { path, reason: e });
                continue;
            }
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sheet_name = unique_sheet_name(&stem, &mut used_names);

        report.sheets.push(CombinedSheet {
            source: path,
            sheet_name: sheet_name.clone(),
        });
        tables.push(NamedTable::new(sheet_name, table.table));
    }

    if tables.is_empty() {
        return Err(format!("No .xlsx timesheets found in {}", folder.display()));
    }

    report.cells_written = xlsx::write_tables(output, &tables)?.cells_written;
    Ok(report)
}

/// `.xlsx` files directly inside `folder`, sorted by file name.
fn list_workbooks(folder: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = std::fs::read_dir(folder)
        .map_err(|e| format!("Cannot read folder {}: {}", folder.display(), e))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("xlsx"))
        })
        .collect();

    paths.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(paths)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Make `stem` a legal Excel sheet name: no `[]:*?/\`, no leading or
/// trailing apostrophe, at most 31 characters, never empty.
pub fn sanitize_sheet_name(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| if INVALID_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'');
    let truncated: String = cleaned.chars().take(MAX_SHEET_NAME).collect();

    if truncated.trim().is_empty() {
        "Sheet".to_string()
    } else {
        truncated
    }
}

/// Sanitized name not yet in `used` (compared case-insensitively, as Excel
/// does). Clashes get a ` (2)`, ` (3)`... suffix inside the length limit.
fn unique_sheet_name(stem: &str, used: &mut HashSet<String>) -> String {
    let base = sanitize_sheet_name(stem);
    let mut candidate = base.clone();
    let mut n = 2;

    while used.contains(&candidate.to_lowercase()) {
        let suffix = format!(" ({n})");
        let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
        candidate = base.chars().take(keep).collect::<String>() + &suffix;
        n += 1;
    }

    used.insert(candidate.to_lowercase());
    candidate
}
