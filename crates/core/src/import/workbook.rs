//! Read access to named sheets of a workbook.
//!
//! Rows and cells are addressed by their absolute sheet position: row 1 is the
//! first row of the sheet (the header), column 0 is column `A`.

use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use thiserror::Error;

/// Errors raised while opening or reading a workbook.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// The bytes are not a readable workbook.
    #[error("Cannot read workbook: {0}")]
    Unreadable(String),

    /// The workbook has no sheet with this name.
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),
}

/// Absolute address of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    /// Zero-based column index (`A` = 0).
    pub column: u32,
    /// One-based row number.
    pub row: u32,
}

impl CellRef {
    /// Creates a reference to `column` (zero-based) in `row` (one-based).
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for CellRef {
    /// `A1` notation, e.g. column 1 row 7 is `B7`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut n = self.column + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
            n = (n - 1) / 26;
        }
        letters.reverse();
        let column: String = letters.into_iter().collect();
        write!(f, "{column}{}", self.row)
    }
}

/// Named sheets of text cells.
pub trait SheetReader: Send + Sync {
    /// Every row of `sheet` from row 1, each with trailing empty cells trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbookError::SheetNotFound`] if the sheet does not exist.
    fn rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, WorkbookError>;

    /// Text of a single cell, `None` if the cell is outside the sheet's data.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbookError::SheetNotFound`] if the sheet does not exist.
    fn cell(&self, sheet: &str, at: CellRef) -> Result<Option<String>, WorkbookError>;
}

/// Text cells of one sheet, row-major from `A1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Grid(Vec<Vec<String>>);

impl Grid {
    fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self(
            rows.into_iter()
                .map(|mut row| {
                    while row.last().is_some_and(String::is_empty) {
                        row.pop();
                    }
                    row
                })
                .collect(),
        )
    }

    fn from_range(range: &Range<Data>) -> Self {
        let Some((last_row, last_column)) = range.end() else {
            return Self::default();
        };
        let rows = (0..=last_row)
            .map(|row| {
                (0..=last_column)
                    .map(|column| range.get_value((row, column)).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }

    fn cell(&self, at: CellRef) -> Option<String> {
        let row = usize::try_from(at.row.checked_sub(1)?).ok()?;
        let column = usize::try_from(at.column).ok()?;
        self.0.get(row)?.get(column).cloned()
    }
}

/// Renders a cell the way it reads in the sheet.
///
/// Whole floats lose their `.0`; date cells become their serial number.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        other => other.to_string(),
    }
}

fn sheet<'a>(sheets: &'a HashMap<String, Grid>, name: &str) -> Result<&'a Grid, WorkbookError> {
    sheets
        .get(name)
        .ok_or_else(|| WorkbookError::SheetNotFound(name.to_string()))
}

/// An `.xlsx` workbook loaded fully into memory.
#[derive(Debug, Clone)]
pub struct XlsxWorkbook {
    sheets: HashMap<String, Grid>,
}

impl XlsxWorkbook {
    /// Parses an uploaded workbook.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbookError::Unreadable`] if the bytes are not a valid
    /// `.xlsx` file or a sheet cannot be decoded.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, WorkbookError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e: calamine::XlsxError| WorkbookError::Unreadable(e.to_string()))?;

        let mut sheets = HashMap::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| WorkbookError::Unreadable(e.to_string()))?;
            sheets.insert(name, Grid::from_range(&range));
        }

        Ok(Self { sheets })
    }

    /// Names of every loaded sheet.
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }
}

impl SheetReader for XlsxWorkbook {
    fn rows(&self, name: &str) -> Result<Vec<Vec<String>>, WorkbookError> {
        Ok(sheet(&self.sheets, name)?.0.clone())
    }

    fn cell(&self, name: &str, at: CellRef) -> Result<Option<String>, WorkbookError> {
        Ok(sheet(&self.sheets, name)?.cell(at))
    }
}

/// A workbook assembled in code, used by tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: HashMap<String, Grid>,
}

impl MemoryWorkbook {
    /// Creates a workbook with no sheets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a sheet. `rows` start at row 1, header included.
    #[must_use]
    pub fn with_sheet<R, C>(mut self, name: &str, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.sheets.insert(name.to_string(), Grid::from_rows(rows));
        self
    }
}

impl SheetReader for MemoryWorkbook {
    fn rows(&self, name: &str) -> Result<Vec<Vec<String>>, WorkbookError> {
        Ok(sheet(&self.sheets, name)?.0.clone())
    }

    fn cell(&self, name: &str, at: CellRef) -> Result<Option<String>, WorkbookError> {
        Ok(sheet(&self.sheets, name)?.cell(at))
    }
}
