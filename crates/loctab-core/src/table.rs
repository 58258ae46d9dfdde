//! Localization table parsed from a single key-value file

use crate::codec::decode;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed table from a single key-value file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocaleTable {
    /// Key -> value, unique keys
    pub entries: BTreeMap<String, String>,
    /// Source file path
    pub source_path: PathBuf,
}

impl LocaleTable {
    /// Create a new empty table
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            entries: BTreeMap::new(),
            source_path,
        }
    }

    /// Parse table text.
    ///
    /// Raw lines are sorted before decoding, so when a key repeats the
    /// lexicographically last line for that key wins. A leading UTF-8 BOM
    /// is ignored.
    pub fn parse_str(content: &str, sep: &str, source_path: impl Into<PathBuf>) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines: Vec<&str> = content.lines().collect();
        lines.sort_unstable();

        let mut table = Self::new(source_path.into());
        for pair in lines.into_iter().filter_map(|line| decode(line, sep)) {
            table.entries.insert(pair.key, pair.value);
        }
        table
    }

    /// Read and parse a table file
    pub fn load<P: AsRef<Path>>(path: P, sep: &str) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::parse_str(&content, sep, path))
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// File name used in reports (falls back to the full path)
    pub fn display_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_table() {
        let table = LocaleTable::parse_str("b=2\na=1\n", "=", "en.csv");

        assert_eq!(table.key_count(), 2);
        assert_eq!(table.get("a"), Some("1"));
        assert_eq!(table.get("b"), Some("2"));
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let table = LocaleTable::parse_str("a=1\njunk line\n\nb=2\n", "=", "en.csv");

        assert_eq!(table.key_count(), 2);
        assert_eq!(table.get("junk line"), None);
    }

    #[test]
    fn test_duplicate_key_lexicographically_last_wins() {
        // File order puts "z" last, but after sorting "a=zz" follows "a=b".
        let table = LocaleTable::parse_str("a=zz\na=b\n", "=", "en.csv");
        assert_eq!(table.get("a"), Some("zz"));
    }

    #[test]
    fn test_parse_crlf_lines() {
        let table = LocaleTable::parse_str("a=1\r\nb=2\r\n", "=", "en.csv");
        assert_eq!(table.get("a"), Some("1"));
        assert_eq!(table.get("b"), Some("2"));
    }

    #[test]
    fn test_display_name() {
        let table = LocaleTable::new(PathBuf::from("some/dir/sheet1.csv"));
        assert_eq!(table.display_name(), "sheet1.csv");
    }

    #[test]
    fn test_load_missing_file() {
        let err = LocaleTable::load("definitely/not/here.csv", "=").unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_load_strips_utf8_bom() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("en.csv");
        fs::write(&path, "\u{feff}alpha=A\nbeta=B\n").unwrap();

        let table = LocaleTable::load(&path, "=").unwrap();

        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["alpha", "beta"]);
        assert_eq!(table.get("alpha"), Some("A"));
    }
}
