use crate::domain::sorting::SortValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Group key used for records whose grouping field is missing or blank
pub const UNGROUPED: &str = "Ungrouped";

/// Stable identity of a record within a board or table
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key derived from the record's position when it carries no id
    pub fn positional(index: usize) -> Self {
        Self(index.to_string())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A record that may carry its own identity
pub trait Identified {
    /// The record's id, or `None` when it has no id field
    fn id(&self) -> Option<RecordKey>;
}

/// A record that can be bucketed into a board column
pub trait Grouped: Identified {
    /// Value of the grouping field (stage, status, ...)
    fn group_key(&self) -> Option<String>;

    /// Amount summed into the column total
    fn amount(&self) -> Option<f64> {
        None
    }
}

/// A record whose grouping field can be rewritten by a move
pub trait Regroupable: Grouped {
    fn set_group_key(&mut self, key: &str);
}

/// A record exposing named values to the table comparator
pub trait Sortable {
    fn sort_value(&self, key: &str) -> SortValue;
}

/// A record that can be matched by a free-text filter
pub trait Searchable {
    /// Case-insensitive match of `needle` against the record's text fields.
    /// `needle` is already lowercased.
    fn matches(&self, needle: &str) -> bool;
}

/// Resolves the key of `record`, falling back to its position
pub fn record_key<T: Identified + ?Sized>(record: &T, index: usize) -> RecordKey {
    match record.id() {
        Some(key) if !key.as_str().is_empty() => key,
        _ => RecordKey::positional(index),
    }
}

/// Normalizes a raw group key, mapping missing or blank values to [`UNGROUPED`]
pub fn normalize_group_key(key: Option<String>) -> String {
    match key {
        Some(key) if !key.trim().is_empty() => key,
        _ => UNGROUPED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Anonymous;

    impl Identified for Anonymous {
        fn id(&self) -> Option<RecordKey> {
            None
        }
    }

    struct Blank;

    impl Identified for Blank {
        fn id(&self) -> Option<RecordKey> {
            Some(RecordKey::new(""))
        }
    }

    #[test]
    fn test_record_key_falls_back_to_position() {
        assert_eq!(record_key(&Anonymous, 4).as_str(), "4");
        assert_eq!(record_key(&Blank, 2).as_str(), "2");
    }

    #[test]
    fn test_normalize_group_key() {
        assert_eq!(normalize_group_key(Some("won".to_string())), "won");
        assert_eq!(normalize_group_key(Some("  ".to_string())), UNGROUPED);
        assert_eq!(normalize_group_key(None), UNGROUPED);
    }
}
