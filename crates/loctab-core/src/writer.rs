//! Persist a merged matrix as a single-sheet workbook

use crate::error::{Error, Result};
use crate::merger::MergedMatrix;
use rust_xlsxwriter::{Workbook, XlsxError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Name of the only worksheet in the output workbook
pub const SHEET_NAME: &str = "sheet";

/// Display width applied to every column
pub const COLUMN_WIDTH: f64 = 50.0;

/// Suffix appended to the previous output file
pub const BACKUP_SUFFIX: &str = ".old";

/// What happened to a pre-existing output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// Nothing to back up
    NotNeeded,
    /// Previous file copied here and removed from the destination
    Created(PathBuf),
    /// Backup failed; the write was attempted anyway
    Failed(String),
}

/// Result of backing up and writing one workbook
#[derive(Debug)]
pub struct WriteReport {
    pub backup: BackupOutcome,
    /// Path written, or the error that stopped the write
    pub written: Result<PathBuf>,
}

impl WriteReport {
    pub fn is_success(&self) -> bool {
        self.written.is_ok()
    }
}

/// `<path>.old`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Back up any existing file at `path`, then write `matrix` there.
///
/// Neither phase panics or returns early on failure; both outcomes are
/// recorded in the report and logged. The destination is not written
/// atomically.
pub fn write_workbook(matrix: &MergedMatrix, path: &Path) -> WriteReport {
    let backup = match backup_existing(path) {
        Ok(Some(old)) => {
            debug!("Backed up {} to {}", path.display(), old.display());
            BackupOutcome::Created(old)
        }
        Ok(None) => BackupOutcome::NotNeeded,
        Err(e) => {
            error!("Error creating backup file: {}", e);
            BackupOutcome::Failed(e.to_string())
        }
    };

    let written = save_matrix(matrix, path).map(|()| path.to_path_buf());
    if let Err(e) = &written {
        error!("Error writing workbook: {}", e);
    }

    WriteReport { backup, written }
}

/// Copy `path` to `<path>.old` (replacing an older backup) and delete it
fn backup_existing(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let old = backup_path(path);
    fs::copy(path, &old).map_err(|e| Error::FileWrite {
        path: old.clone(),
        source: e,
    })?;
    fs::remove_file(path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Some(old))
}

fn save_matrix(matrix: &MergedMatrix, path: &Path) -> Result<()> {
    let xlsx_error = |e: XlsxError| Error::XlsxWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(xlsx_error)?;

    for col in 0..matrix.column_count() {
        let col_num = cast_col_num(col)?;
        worksheet
            .set_column_width(col_num, COLUMN_WIDTH)
            .map_err(xlsx_error)?;

        for row in 0..matrix.row_count() {
            let value = matrix.get(row, col).unwrap_or_default();
            worksheet
                .write_string(cast_row_num(row)?, col_num, value)
                .map_err(xlsx_error)?;
        }
    }

    workbook.save(path).map_err(xlsx_error)
}

fn cast_row_num(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::IndexOverflow {
        axis: "row",
        index: value,
    })
}

fn cast_col_num(value: usize) -> Result<u16> {
    u16::try_from(value).map_err(|_| Error::IndexOverflow {
        axis: "column",
        index: value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merger::merge_tables;
    use crate::table::LocaleTable;
    use crate::workbook::{SheetSource, WorkbookSource, XlsxWorkbook};
    use tempfile::TempDir;

    fn sample_matrix() -> MergedMatrix {
        let a = LocaleTable::parse_str("x=1\ny=2\n", "=", "a.csv");
        let b = LocaleTable::parse_str("x=10\n", "=", "b.csv");
        merge_tables(&[a, b]).matrix
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("out/locales.xlsx")),
            PathBuf::from("out/locales.xlsx.old")
        );
    }

    #[test]
    fn test_write_new_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("locales.xlsx");

        let report = write_workbook(&sample_matrix(), &path);

        assert_eq!(report.backup, BackupOutcome::NotNeeded);
        assert!(report.is_success());

        let book = XlsxWorkbook::open(&path).unwrap();
        let sheet = &book.sheets()[0];
        assert_eq!(sheet.name(), SHEET_NAME);
        assert_eq!(sheet.dimensions(), (2, 3));
        assert_eq!(sheet.cell_text(1, 1), Some("x".to_string()));
        assert_eq!(sheet.cell_text(1, 2), Some("1".to_string()));
        assert_eq!(sheet.cell_text(1, 3), Some("10".to_string()));
        assert_eq!(sheet.cell_text(2, 3), Some("y".to_string()));
    }

    #[test]
    fn test_existing_file_is_backed_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("locales.xlsx");
        let previous = b"previous workbook bytes".to_vec();
        fs::write(&path, &previous).unwrap();
        fs::write(backup_path(&path), b"older backup").unwrap();

        let report = write_workbook(&sample_matrix(), &path);

        assert_eq!(report.backup, BackupOutcome::Created(backup_path(&path)));
        assert!(report.is_success());
        assert_eq!(fs::read(backup_path(&path)).unwrap(), previous);
        assert_ne!(fs::read(&path).unwrap(), previous);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing_dir").join("locales.xlsx");

        let report = write_workbook(&sample_matrix(), &path);

        assert_eq!(report.backup, BackupOutcome::NotNeeded);
        assert!(matches!(report.written, Err(Error::XlsxWrite { .. })));
    }
}
