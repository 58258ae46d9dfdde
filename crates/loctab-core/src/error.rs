//! Error types for loctab-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in loctab-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Workbook could not be opened by the spreadsheet reader
    #[error("failed to open workbook '{path}': {message}")]
    WorkbookOpen { path: PathBuf, message: String },

    /// A worksheet inside an opened workbook could not be read
    #[error("failed to read sheet '{sheet}' in '{path}': {message}")]
    SheetRead {
        path: PathBuf,
        sheet: String,
        message: String,
    },

    /// Spreadsheet writer error
    #[error("failed to write workbook '{path}': {source}")]
    XlsxWrite {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// Settings file exists but could not be parsed
    #[error("can't load settings file '{path}': {source}")]
    SettingsLoad {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Matrix does not fit into a worksheet
    #[error("{axis} index {index} exceeds worksheet limits")]
    IndexOverflow { axis: &'static str, index: usize },

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
