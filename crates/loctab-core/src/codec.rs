//! Key-value line codec for localization table files
//!
//! A table line is `key<separator>value`. The separator is any non-empty
//! string; when a value itself contains the separator, everything after the
//! first occurrence belongs to the value.

/// A single decoded `key<separator>value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueLine {
    pub key: String,
    pub value: String,
}

impl KeyValueLine {
    /// Create a new pair, trimming both sides
    pub fn new(key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        Self {
            key: key.as_ref().trim().to_string(),
            value: value.as_ref().trim().to_string(),
        }
    }

    /// Serialize this pair with the given separator
    pub fn to_line(&self, sep: &str) -> String {
        encode(&self.key, &self.value, sep)
    }
}

/// Encode a pair as a single table line.
///
/// The key is trimmed; the value is written as given.
pub fn encode(key: &str, value: &str, sep: &str) -> String {
    let key = key.trim();
    let mut line = String::with_capacity(key.len() + sep.len() + value.len());
    line.push_str(key);
    line.push_str(sep);
    line.push_str(value);
    line
}

/// Decode a table line into a pair.
///
/// Returns `None` when the separator does not occur in the line (or the
/// separator is empty). Malformed lines are dropped by callers, never
/// reported.
pub fn decode(line: &str, sep: &str) -> Option<KeyValueLine> {
    if sep.is_empty() {
        return None;
    }

    // Rejoining every segment after the first split is the same as taking
    // the remainder after the first occurrence.
    let (key, value) = line.trim().split_once(sep)?;
    Some(KeyValueLine::new(key, value))
}
