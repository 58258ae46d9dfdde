//! loctab-core: Core library for converting between workbooks and
//! localization tables
//!
//! This library provides functionality to:
//! - Split every value column of a workbook into a sorted `key=value` file
//! - Parse `key=value` table files
//! - Merge a directory of table files into one key-aligned matrix
//! - Write the matrix to a single-sheet workbook, keeping a `.old` backup

pub mod codec;
pub mod error;
pub mod merger;
pub mod settings;
pub mod splitter;
pub mod table;
pub mod workbook;
pub mod writer;

pub use codec::{decode, encode, KeyValueLine};
pub use error::{Error, Result};
pub use merger::{
    load_tables, merge_directory, merge_tables, FileFailure, MergeOutcome, MergeReport,
    MergedMatrix, MissingKey,
};
pub use settings::Settings;
pub use splitter::{collect_column, split_workbooks, SplitReport, Splitter};
pub use table::LocaleTable;
pub use workbook::{MemorySheet, MemoryWorkbook, SheetSource, WorkbookSource, XlsxWorkbook};
pub use writer::{write_workbook, BackupOutcome, WriteReport};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_split_then_merge_round_trip() {
        let source_dir = TempDir::new().unwrap();
        let settings = Settings {
            workbook_file: "source.xlsx".to_string(),
            ..Settings::default()
        };

        // Build a one-column source workbook through the merge writer
        let table = LocaleTable::parse_str(
            "menu.open=Open\nmenu.close=Close\nmenu.quit=Quit\n",
            "=",
            "en.csv",
        );
        let outcome = merge_tables(&[table]);
        let report = write_workbook(&outcome.matrix, &source_dir.path().join("source.xlsx"));
        assert!(report.is_success());

        let split = split_workbooks(&settings, source_dir.path()).unwrap();
        assert_eq!(split.workbooks_found, 1);
        assert_eq!(split.sheets_processed, 1);
        assert_eq!(
            fs::read_to_string(source_dir.path().join("sheet1.csv")).unwrap(),
            "menu.close=Close\nmenu.open=Open\nmenu.quit=Quit\n"
        );

        let merged = merge_directory(&settings, source_dir.path()).unwrap();
        assert_eq!(merged.files_processed, 1);
        assert!(merged.missing.is_empty());
        assert!(merged.write.unwrap().is_success());

        let book = XlsxWorkbook::open(source_dir.path().join("locales.xlsx")).unwrap();
        let sheet = &book.sheets()[0];
        assert_eq!(sheet.dimensions(), (3, 2));
        let values: Vec<_> = (1..=3).filter_map(|row| sheet.cell_text(row, 2)).collect();
        assert_eq!(values, vec!["Close", "Open", "Quit"]);
    }
}
