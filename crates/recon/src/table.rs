//! Typed 2-D cell grids handed to the parsers by the IO layer.

use std::fmt;

use chrono::NaiveDate;

use crate::error::ReconError;

static EMPTY: Cell = Cell::Empty;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    /// Empty cells and whitespace-only text both count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) | Self::Date(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numbers, or text that parses as one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Dates, or text in `DD/MM/YYYY` or ISO `YYYY-MM-DD` form.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Text(s) => parse_date_text(s.trim()),
            _ => None,
        }
    }

    /// Text content with surrounding whitespace removed, or the display form
    /// of a non-text cell.
    pub fn trimmed(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format("%d/%m/%Y")),
        }
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A ragged grid of cells addressed by absolute (row, col), 0-indexed.
/// Reads outside the populated area return `Cell::Empty`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(&EMPTY)
    }

    pub fn at(&self, cell: CellRef) -> &Cell {
        self.get(cell.row, cell.col)
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        self.rows.get(row).map(|r| r.as_slice()).unwrap_or(&[])
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// True when no cell holds a value.
    pub fn is_blank(&self) -> bool {
        self.rows.iter().flatten().all(Cell::is_empty)
    }
}

/// A sheet as read from a workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTable {
    pub name: String,
    pub table: Table,
}

impl NamedTable {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self { name: name.into(), table }
    }
}

// ---------------------------------------------------------------------------
// Header lookup
// ---------------------------------------------------------------------------

/// Column lookup over a header row. Header text is compared trimmed, so
/// `"Horsenden "` matches `"Horsenden"`; the first occurrence wins.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    headers: Vec<(String, usize)>,
}

impl HeaderIndex {
    pub fn new(row: &[Cell]) -> Self {
        let headers = row
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_empty())
            .map(|(i, c)| (c.trimmed(), i))
            .collect();
        Self { headers }
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().find(|(h, _)| h == name).map(|(_, i)| *i)
    }

    pub fn require(&self, sheet: &str, name: &str) -> Result<usize, ReconError> {
        self.find(name).ok_or_else(|| ReconError::MalformedTable {
            sheet: sheet.to_string(),
            reason: format!("missing column '{name}'"),
        })
    }
}

// ---------------------------------------------------------------------------
// A1 references
// ---------------------------------------------------------------------------

/// A fixed cell position, written `D5` in configs and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse `"D5"` → row 4, col 3. Letters must precede digits.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let split = s.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }

        let mut col: usize = 0;
        for ch in letters.chars() {
            let v = ch.to_ascii_uppercase() as usize - 'A' as usize + 1;
            col = col.checked_mul(26)?.checked_add(v)?;
        }

        let row: usize = digits.parse().ok()?;
        if row == 0 {
            return None;
        }

        Some(Self { row: row - 1, col: col - 1 })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", col_to_letter(self.col), self.row + 1)
    }
}

/// Convert column index to spreadsheet letters (0 = A, 25 = Z, 26 = AA).
pub fn col_to_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}
