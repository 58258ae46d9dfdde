//! Workbook -> table files
//!
//! Column 1 of every worksheet holds the keys; every other column becomes
//! its own table file `sheet<N><ext>`, sorted by line text. `N` counts
//! columns that produced output across all workbooks of one run.

use crate::codec::KeyValueLine;
use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::workbook::{SheetSource, WorkbookSource, XlsxWorkbook};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix of generated table file names
pub const SHEET_FILE_PREFIX: &str = "sheet";

/// Summary of one split run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Workbooks discovered
    pub workbooks_found: usize,
    /// Value columns that produced a table file
    pub sheets_processed: usize,
    /// Files written, in output order
    pub files_written: Vec<PathBuf>,
}

/// Split every configured workbook in `dir` into table files written to `dir`.
///
/// A workbook that cannot be opened aborts the run; files already written
/// stay on disk.
pub fn split_workbooks<P: AsRef<Path>>(settings: &Settings, dir: P) -> Result<SplitReport> {
    let dir = dir.as_ref();
    let files = settings.work_files(dir)?;
    info!("Excel files found: {}", files.len());

    let mut splitter = Splitter::new(settings, dir);
    splitter.report.workbooks_found = files.len();

    for path in &files {
        let workbook = XlsxWorkbook::open(path)?;
        debug!("Splitting {}", path.display());
        splitter.split_workbook(&workbook)?;
    }

    let report = splitter.finish();
    info!("Excel sheets processed: {}", report.sheets_processed);
    Ok(report)
}

/// Stateful splitter carrying the output counter across workbooks
#[derive(Debug)]
pub struct Splitter<'a> {
    settings: &'a Settings,
    out_dir: PathBuf,
    report: SplitReport,
}

impl<'a> Splitter<'a> {
    pub fn new(settings: &'a Settings, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            out_dir: out_dir.into(),
            report: SplitReport::default(),
        }
    }

    /// Split the first `processed_sheet_count` sheets of one workbook.
    ///
    /// Returns the number of files written for this workbook.
    pub fn split_workbook<W: WorkbookSource>(&mut self, workbook: &W) -> Result<usize> {
        let sheets = workbook.sheets();
        let limit = self.settings.sheet_limit(sheets.len());
        let before = self.report.sheets_processed;

        for sheet in &sheets[..limit] {
            self.split_sheet(sheet)?;
        }

        Ok(self.report.sheets_processed - before)
    }

    /// Split every value column (2..=cols) of one sheet
    pub fn split_sheet<S: SheetSource>(&mut self, sheet: &S) -> Result<()> {
        let (_, cols) = sheet.dimensions();
        let sep = &self.settings.out_file_separator;

        for col in 2..=cols {
            let lines = collect_column(sheet, col, sep);
            if lines.is_empty() {
                continue;
            }

            self.report.sheets_processed += 1;
            let file_name = format!(
                "{}{}{}",
                SHEET_FILE_PREFIX,
                self.report.sheets_processed,
                self.settings.format_extension()
            );
            let path = self.out_dir.join(file_name);
            write_lines(&path, &lines)?;
            debug!(
                "Wrote {} lines from sheet '{}' column {} to {}",
                lines.len(),
                sheet.name(),
                col,
                path.display()
            );
            self.report.files_written.push(path);
        }

        Ok(())
    }

    pub fn report(&self) -> &SplitReport {
        &self.report
    }

    pub fn finish(self) -> SplitReport {
        self.report
    }
}

/// Encoded, sorted lines of one value column.
///
/// Rows with a blank key or a blank value are skipped.
pub fn collect_column<S: SheetSource>(sheet: &S, col: usize, sep: &str) -> Vec<String> {
    let (rows, _) = sheet.dimensions();
    let mut lines = Vec::new();

    for row in 1..=rows {
        let Some(key) = sheet.cell_text(row, 1) else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let value = sheet.cell_text(row, col).unwrap_or_default();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        lines.push(KeyValueLine::new(key, value).to_line(sep));
    }

    lines.sort();
    lines
}

/// Write lines as UTF-8, one per line, replacing any existing file
fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let to_error = |e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line).map_err(to_error)?;
    }
    writer.flush().map_err(to_error)
}
