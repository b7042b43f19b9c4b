// CSV/TSV import for sign-in exports

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use timecheck_recon::{Cell, NamedTable, Table};

/// Read a delimited export into a table named after the file stem.
/// The delimiter is sniffed from the first lines.
pub fn read_table(path: &Path) -> Result<NamedTable, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    let table = parse_table(&content, delimiter)?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    log::debug!(
        "{}: {} rows, delimiter {:?}",
        path.display(),
        table.height(),
        delimiter as char
    );
    Ok(NamedTable::new(name, table))
}

/// Pick the delimiter that gives the most consistent multi-field split over
/// the first ten lines. Candidates: tab, semicolon, comma, pipe.
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().take(10).collect();

    let field_count = |line: &str, delim: u8| {
        csv::ReaderBuilder::new()
            .delimiter(delim)
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes())
            .records()
            .next()
            .and_then(|r| r.ok())
            .map_or(1, |r| r.len())
    };

    let mut best = (b',', 0usize);
    for delim in [b'\t', b';', b',', b'|'] {
        let counts: Vec<usize> = sample.iter().map(|line| field_count(line, delim)).collect();
        let Some(&target) = counts.first().filter(|&&n| n > 1) else {
            continue;
        };
        let score = counts.iter().filter(|&&c| c == target).count() * target;
        if score > best.1 {
            best = (delim, score);
        }
    }

    best.0
}

/// Read file and convert to UTF-8 if needed (Excel on Windows writes CP-1252).
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(e.as_bytes());
            Ok(decoded.into_owned())
        }
    }
}

fn parse_table(content: &str, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| format!("line {}: {}", idx + 1, e))?;
        rows.push(record.iter().map(type_field).collect());
    }

    Ok(Table::new(rows))
}

/// Numbers, then `DD/MM/YYYY` or ISO dates, else text.
fn type_field(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        if n.is_finite() {
            return Cell::Number(n);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_or_else(|_| Cell::Text(field.to_string()), Cell::Date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "Name;Level;Squad\nJane Doe;L2;Masters\nJohn Smith;L1;NP\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        let content = "Name\tLevel\tSquad\nJane Doe\tL2\tMasters\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        let content = "Name;Level;Note\n\"Doe, Jane\";L2;\"late, 10 mins\"\nBob;L1;none\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_single_column_defaults_to_comma() {
        assert_eq!(sniff_delimiter("Name\nJane\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn test_type_field() {
        assert_eq!(type_field(""), Cell::Empty);
        assert_eq!(type_field("  "), Cell::Empty);
        assert_eq!(type_field("4.5"), Cell::Number(4.5));
        assert_eq!(type_field("NaN"), Cell::Text("NaN".into()));
        assert_eq!(
            type_field("01/07/2024"),
            Cell::Date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
        );
        assert_eq!(
            type_field("2024-07-01"),
            Cell::Date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
        );
        assert_eq!(type_field("Jane Doe"), Cell::Text("Jane Doe".into()));
    }

    #[test]
    fn test_read_sign_in_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("July.csv");
        fs::write(
            &path,
            "Name,Level,Squad,01/07/2024,02/07/2024\nJane Doe,L2,Masters,4,\nJohn Smith,L1,NP,,1.5\n",
        )
        .unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.name, "July");
        let t = &table.table;
        assert_eq!(t.height(), 3);
        assert_eq!(t.get(0, 3), &Cell::Date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()));
        assert_eq!(t.get(1, 3), &Cell::Number(4.0));
        assert!(t.get(1, 4).is_empty());
        assert_eq!(t.get(2, 4), &Cell::Number(1.5));
    }

    #[test]
    fn test_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "Zoë" in CP-1252
        fs::write(&path, b"Name,Level\nZo\xEB,L1\n").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.table.get(1, 0), &Cell::Text("Zoë".into()));
    }
}
