//! Merge engine: table files -> one key-aligned matrix

use crate::error::Result;
use crate::settings::Settings;
use crate::table::LocaleTable;
use crate::writer::{write_workbook, WriteReport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Row-major grid of cell text.
///
/// Column 0 holds the key of each row, columns `1..=F` the value from each
/// source file. Rows are sorted by key; value columns are ordered by
/// descending key count of their source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<String>,
    /// Source file of each value column, in column order
    pub sources: Vec<PathBuf>,
}

impl MergedMatrix {
    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Get the number of columns, including the key column
    pub fn column_count(&self) -> usize {
        self.cols
    }

    /// Cell text at `(row, col)`, 0-based
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).map(String::as_str)
    }

    /// All cells of one row
    pub fn row(&self, row: usize) -> Option<&[String]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.cells[start..start + self.cols])
    }

    /// Keys in row order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        (0..self.rows).filter_map(move |r| self.get(r, 0))
    }

    /// Value column belonging to `source`, if any
    pub fn column_of(&self, source: &Path) -> Option<usize> {
        self.sources.iter().position(|s| s == source).map(|i| i + 1)
    }
}

/// A key absent from one of the merged files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingKey {
    pub key: String,
    pub file: PathBuf,
}

/// A table file that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Matrix plus the keys that had to fall back to their own text
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub matrix: MergedMatrix,
    pub missing: Vec<MissingKey>,
}

/// Summary of one merge run
#[derive(Debug)]
pub struct MergeReport {
    /// Table files discovered
    pub files_found: usize,
    /// Table files parsed into the matrix
    pub files_processed: usize,
    /// Files that failed to load and were left out
    pub failures: Vec<FileFailure>,
    /// Keys missing from individual files
    pub missing: Vec<MissingKey>,
    /// Result of writing the workbook; `None` when there was nothing to write
    pub write: Option<WriteReport>,
}

/// Load every table, collecting per-file failures instead of stopping
pub fn load_tables(paths: &[PathBuf], sep: &str) -> (Vec<LocaleTable>, Vec<FileFailure>) {
    let mut tables = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();

    for path in paths {
        match LocaleTable::load(path, sep) {
            Ok(table) => {
                debug!("Parsed {} keys from {}", table.key_count(), path.display());
                tables.push(table);
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                failures.push(FileFailure {
                    path: path.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    (tables, failures)
}

/// Merge tables into a single matrix.
///
/// Tables are reordered by descending key count; ties keep their input
/// order. A key missing from a table is logged and its own text is used as
/// the cell value.
pub fn merge_tables(tables: &[LocaleTable]) -> MergeOutcome {
    let mut ordered: Vec<&LocaleTable> = tables.iter().collect();
    ordered.sort_by(|a, b| b.key_count().cmp(&a.key_count()));

    let keys: BTreeSet<&str> = ordered.iter().flat_map(|t| t.keys()).collect();

    let rows = keys.len();
    let cols = ordered.len() + 1;
    let mut cells = Vec::with_capacity(rows * cols);
    let mut missing = Vec::new();

    for key in &keys {
        cells.push(key.to_string());
        for table in &ordered {
            match table.get(key) {
                Some(value) => cells.push(value.to_string()),
                None => {
                    warn!(key = %key, file = %table.display_name(), "Key not found");
                    missing.push(MissingKey {
                        key: key.to_string(),
                        file: table.source_path.clone(),
                    });
                    cells.push(key.to_string());
                }
            }
        }
    }

    MergeOutcome {
        matrix: MergedMatrix {
            rows,
            cols,
            cells,
            sources: ordered.iter().map(|t| t.source_path.clone()).collect(),
        },
        missing,
    }
}

/// Merge every table file in `dir` and write the workbook configured in
/// `settings` into `dir`.
///
/// Only discovery errors are returned as `Err`; per-file and write failures
/// are carried in the report.
pub fn merge_directory<P: AsRef<Path>>(settings: &Settings, dir: P) -> Result<MergeReport> {
    let dir = dir.as_ref();
    let files = settings.table_files(dir)?;
    info!("Table files found: {}", files.len());

    let (tables, failures) = load_tables(&files, &settings.out_file_separator);
    let mut report = MergeReport {
        files_found: files.len(),
        files_processed: tables.len(),
        failures,
        missing: Vec::new(),
        write: None,
    };

    if tables.is_empty() {
        return Ok(report);
    }

    let outcome = merge_tables(&tables);
    info!("Table files processed: {}", report.files_processed);
    report.missing = outcome.missing;

    let output = dir.join(&settings.export_book_file);
    report.write = Some(write_workbook(&outcome.matrix, &output));

    Ok(report)
}
