//! Core data shapes shared across the pipeline.

use crate::amount::Cents;
use crate::table::TableSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A full point-in-time dump of the feed: header plus ordered rows.
///
/// Immutable once written to the snapshot store; the engine only ever
/// reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ordered column names.
    pub header: Vec<String>,
    /// Ordered raw rows, exactly as produced by the source.
    pub rows: Vec<Vec<String>>,
}

impl Snapshot {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Snapshot { header, rows }
    }

    /// True when the snapshot carries neither header nor rows
    /// (a freshly seeded previous snapshot).
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }
}

/// A current-snapshot row with no raw-tuple match in the previous
/// snapshot, with its aggregation columns parsed to cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    /// Raw fields, untouched textual form.
    pub fields: Vec<String>,
    /// Parsed cents for each `TableSpec::amount_columns` entry, in the
    /// same order as the spec lists them.
    pub amounts: Vec<Cents>,
}

impl NewEntry {
    /// The leading key (sale/document number) under `spec`.
    ///
    /// A row too short to carry the key column yields the empty key;
    /// such rows form their own group rather than being dropped.
    pub fn leading_key<'a>(&'a self, spec: &TableSpec) -> &'a str {
        self.fields
            .get(spec.key_column)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Typed report-category key: a fixed-length prefix of the leading
/// column (e.g. `PM` out of `PM001`).
///
/// Keeping the key typed (rather than slicing strings at call sites)
/// makes miskeying on malformed leading fields impossible to do
/// silently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey(String);

impl GroupKey {
    /// Extract the group key from a leading field.
    ///
    /// Takes the first `prefix_len` characters (char-boundary safe); a
    /// shorter or empty field yields a shorter or empty key, which is a
    /// valid group of its own.
    pub fn extract(leading_field: &str, prefix_len: usize) -> GroupKey {
        GroupKey(leading_field.chars().take(prefix_len).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_key_extraction() {
        assert_eq!(GroupKey::extract("PM001", 2).as_str(), "PM");
        assert_eq!(GroupKey::extract("CV123", 2).as_str(), "CV");
        assert_eq!(GroupKey::extract("X", 2).as_str(), "X");
        assert_eq!(GroupKey::extract("", 2).as_str(), "");
    }

    #[test]
    fn group_key_extraction_is_char_boundary_safe() {
        assert_eq!(GroupKey::extract("é1234", 2).as_str(), "é1");
    }

    #[test]
    fn leading_key_of_short_row_is_empty() {
        let spec = TableSpec::default();
        let entry = NewEntry {
            fields: vec![],
            amounts: vec![],
        };
        assert_eq!(entry.leading_key(&spec), "");
    }
}
