//! Read access to spreadsheet workbooks
//!
//! The splitter only needs the sheet size and the text of a cell, so the
//! reader is hidden behind [`WorkbookSource`] / [`SheetSource`]. Workbooks on
//! disk are read with calamine; [`MemoryWorkbook`] serves tests and callers
//! that already hold the cells.

use crate::error::{Error, Result};
use calamine::{open_workbook_auto, Data, DataType, Range, Reader, SheetType};
use std::path::{Path, PathBuf};

/// One worksheet, addressed with 1-based row/column indices
pub trait SheetSource {
    /// Worksheet name
    fn name(&self) -> &str;

    /// `(rows, columns)` counted from A1 to the last used cell
    fn dimensions(&self) -> (usize, usize);

    /// Text of the cell at `(row, col)`, `None` when absent or empty
    fn cell_text(&self, row: usize, col: usize) -> Option<String>;
}

/// A workbook whose worksheets are enumerated in workbook order
pub trait WorkbookSource {
    type Sheet: SheetSource;

    fn sheets(&self) -> &[Self::Sheet];
}

/// Worksheet loaded from a workbook file
#[derive(Debug, Clone)]
pub struct XlsxSheet {
    name: String,
    range: Range<Data>,
}

impl SheetSource for XlsxSheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimensions(&self) -> (usize, usize) {
        if self.range.is_empty() {
            return (0, 0);
        }
        match self.range.end() {
            Some((row, col)) => (row as usize + 1, col as usize + 1),
            None => (0, 0),
        }
    }

    fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        if row == 0 || col == 0 {
            return None;
        }
        let pos = (u32::try_from(row - 1).ok()?, u32::try_from(col - 1).ok()?);
        self.range
            .get_value(pos)
            .filter(|cell| !cell.is_empty())
            .map(ToString::to_string)
    }
}

/// Workbook file read eagerly into memory
#[derive(Debug, Clone)]
pub struct XlsxWorkbook {
    pub path: PathBuf,
    sheets: Vec<XlsxSheet>,
}

impl XlsxWorkbook {
    /// Open a workbook and load every worksheet.
    ///
    /// Chart sheets and other non-grid sheets are skipped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path).map_err(|e| Error::WorkbookOpen {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let names: Vec<String> = workbook
            .sheets_metadata()
            .iter()
            .filter(|meta| matches!(meta.typ, SheetType::WorkSheet))
            .map(|meta| meta.name.clone())
            .collect();

        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| Error::SheetRead {
                    path: path.to_path_buf(),
                    sheet: name.clone(),
                    message: e.to_string(),
                })?;
            sheets.push(XlsxSheet { name, range });
        }

        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }
}

impl WorkbookSource for XlsxWorkbook {
    type Sheet = XlsxSheet;

    fn sheets(&self) -> &[XlsxSheet] {
        &self.sheets
    }
}

/// In-memory worksheet; `rows[0][0]` is cell A1
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Build a sheet from row-major cell text
    pub fn from_rows<R, C>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            name: name.into(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

impl SheetSource for MemorySheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimensions(&self) -> (usize, usize) {
        let cols = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        if cols == 0 {
            return (0, 0);
        }
        (self.rows.len(), cols)
    }

    fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        if row == 0 || col == 0 {
            return None;
        }
        self.rows
            .get(row - 1)
            .and_then(|r| r.get(col - 1))
            .filter(|text| !text.is_empty())
            .cloned()
    }
}

/// In-memory workbook
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    pub sheets: Vec<MemorySheet>,
}

impl MemoryWorkbook {
    pub fn new(sheets: Vec<MemorySheet>) -> Self {
        Self { sheets }
    }
}

impl WorkbookSource for MemoryWorkbook {
    type Sheet = MemorySheet;

    fn sheets(&self) -> &[MemorySheet] {
        &self.sheets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sheet_dimensions() {
        let sheet = MemorySheet::from_rows("s", vec![vec!["a", "1"], vec!["b", "2", "x"]]);
        assert_eq!(sheet.dimensions(), (2, 3));
        assert_eq!(MemorySheet::new("empty").dimensions(), (0, 0));
    }

    #[test]
    fn test_memory_sheet_cell_text() {
        let sheet = MemorySheet::from_rows("s", vec![vec!["a", ""], vec!["b", "2"]]);
        assert_eq!(sheet.cell_text(1, 1), Some("a".to_string()));
        assert_eq!(sheet.cell_text(1, 2), None);
        assert_eq!(sheet.cell_text(2, 2), Some("2".to_string()));
        assert_eq!(sheet.cell_text(3, 1), None);
        assert_eq!(sheet.cell_text(0, 1), None);
    }

    #[test]
    fn test_xlsx_sheet_reads_values() {
        let mut range = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("key".to_string()));
        range.set_value((0, 1), Data::Float(1.5));
        range.set_value((1, 0), Data::String("other".to_string()));
        range.set_value((1, 1), Data::Int(7));
        let sheet = XlsxSheet {
            name: "s".to_string(),
            range,
        };

        assert_eq!(sheet.dimensions(), (2, 2));
        assert_eq!(sheet.cell_text(1, 1), Some("key".to_string()));
        assert_eq!(sheet.cell_text(1, 2), Some("1.5".to_string()));
        assert_eq!(sheet.cell_text(2, 2), Some("7".to_string()));
    }

    #[test]
    fn test_xlsx_sheet_offset_range_counts_from_a1() {
        let mut range = Range::new((2, 1), (3, 2));
        range.set_value((3, 2), Data::String("late".to_string()));
        let sheet = XlsxSheet {
            name: "s".to_string(),
            range,
        };

        assert_eq!(sheet.dimensions(), (4, 3));
        assert_eq!(sheet.cell_text(4, 3), Some("late".to_string()));
        assert_eq!(sheet.cell_text(1, 1), None);
        assert_eq!(sheet.cell_text(3, 2), None);
    }

    #[test]
    fn test_open_missing_workbook() {
        let err = XlsxWorkbook::open("no/such/book.xlsx").unwrap_err();
        assert!(matches!(err, Error::WorkbookOpen { .. }));
    }
}
