//! Conversion settings and input discovery

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// Extension used when none is configured
pub const DEFAULT_FILE_EXTENSION: &str = "csv";

/// Settings consumed by both pipelines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Single workbook to split; empty means every workbook in the directory
    pub workbook_file: String,
    /// Workbook written by the merge direction
    pub export_book_file: String,
    /// Sheets to process per workbook, 0 = all
    pub processed_sheet_count: usize,
    /// Extension of the table files, with or without the leading dot
    pub out_file_extension: String,
    /// Separator between key and value
    pub out_file_separator: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workbook_file: String::new(),
            export_book_file: "locales.xlsx".to_string(),
            processed_sheet_count: 1,
            out_file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            out_file_separator: "=".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from JSON, creating a default file if none exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            let settings = Self::default();
            settings.save(path)?;
            info!("Settings file not found, created default {}", path.display());
            return Ok(settings);
        }
        Self::load(path)
    }

    /// Load settings from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| Error::SettingsLoad {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save settings to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Extension with a leading dot, e.g. `.csv`
    pub fn format_extension(&self) -> String {
        match self.out_file_extension.trim() {
            "" => format!(".{}", DEFAULT_FILE_EXTENSION),
            ext if ext.starts_with('.') => ext.to_string(),
            ext => format!(".{}", ext),
        }
    }

    /// Maximum number of sheets to take from a workbook
    pub fn sheet_limit(&self, available: usize) -> usize {
        match self.processed_sheet_count {
            0 => available,
            n => n.min(available),
        }
    }

    /// Workbooks to split: the configured one, or every `*.xlsx` in `dir`
    /// whose name does not start with `$` (lock files)
    pub fn work_files<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        if !self.workbook_file.is_empty() {
            return Ok(vec![dir.as_ref().join(&self.workbook_file)]);
        }
        list_files(dir.as_ref(), |name, ext| {
            ext.eq_ignore_ascii_case("xlsx") && !name.starts_with('$')
        })
    }

    /// Table files to merge: every file in `dir` with the configured extension
    pub fn table_files<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let wanted = self.format_extension();
        let wanted = wanted.trim_start_matches('.');
        list_files(dir.as_ref(), |_, ext| ext.eq_ignore_ascii_case(wanted))
    }
}

/// Files directly inside `dir` (not recursive), sorted by file name
fn list_files<F>(dir: &Path, mut accept: F) -> Result<Vec<PathBuf>>
where
    F: FnMut(&str, &str) -> bool,
{
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let name = entry.file_name().to_string_lossy();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy())
            .unwrap_or_default();
        if accept(&*name, &*ext) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}
