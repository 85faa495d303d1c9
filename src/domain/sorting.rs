use crate::domain::record::Sortable;
use crate::error::GridError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Sort direction of the active table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(GridError::InvalidSortDirection(s.to_string())),
        }
    }
}

/// The single active (column, direction) pair governing row order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }
}

/// Header definition of a table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub sortable: bool,
}

impl TableColumn {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

/// A field value as seen by the table comparator
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(DateTime<Utc>),
}

impl SortValue {
    /// Compares two values of the same kind.
    ///
    /// Values of different kinds, nulls and NaN are incomparable and yield
    /// `None`; callers treat that as equal so the stable order is kept.
    pub fn partial_compare(&self, other: &SortValue) -> Option<Ordering> {
        match (self, other) {
            (SortValue::Bool(a), SortValue::Bool(b)) => Some(a.cmp(b)),
            (SortValue::Number(a), SortValue::Number(b)) => a.partial_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => Some(a.cmp(b)),
            (SortValue::Date(a), SortValue::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        SortValue::Text(value.to_string())
    }
}

impl From<f64> for SortValue {
    fn from(value: f64) -> Self {
        SortValue::Number(value)
    }
}

impl From<DateTime<Utc>> for SortValue {
    fn from(value: DateTime<Utc>) -> Self {
        SortValue::Date(value)
    }
}

impl<T: Into<SortValue>> From<Option<T>> for SortValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SortValue::Null)
    }
}

/// Computes the sort spec after a click on `column`'s header.
///
/// Non-sortable columns leave the spec untouched. Clicking the sorted
/// column flips its direction, any other column becomes the sorted one
/// in ascending order.
pub fn toggle_sort(current: Option<&SortSpec>, column: &TableColumn) -> Option<SortSpec> {
    if !column.sortable {
        return current.cloned();
    }

    match current {
        Some(spec) if spec.key == column.key => Some(SortSpec {
            key: spec.key.clone(),
            direction: spec.direction.flipped(),
        }),
        _ => Some(SortSpec::asc(column.key.clone())),
    }
}

/// Returns `records` ordered by `spec` without touching the input slice.
///
/// # Examples
/// ```
/// use gridview_core::domain::sorting::{apply_sort, SortSpec, SortValue};
/// use gridview_core::domain::record::Sortable;
///
/// struct Row(f64);
///
/// impl Sortable for Row {
///     fn sort_value(&self, _key: &str) -> SortValue {
///         SortValue::Number(self.0)
///     }
/// }
///
/// let rows = vec![Row(3.0), Row(1.0), Row(2.0)];
/// let sorted = apply_sort(&rows, Some(&SortSpec::asc("amount")));
/// assert_eq!(sorted[0].0, 1.0);
/// assert_eq!(rows[0].0, 3.0);
/// ```
pub fn apply_sort<'a, T: Sortable>(records: &'a [T], spec: Option<&SortSpec>) -> Vec<&'a T> {
    let mut ordered: Vec<&T> = records.iter().collect();
    let Some(spec) = spec else {
        return ordered;
    };

    // sort_by is stable, so equal and incomparable values keep input order
    ordered.sort_by(|a, b| {
        let cmp = compare_values(&a.sort_value(&spec.key), &b.sort_value(&spec.key));
        match spec.direction {
            SortDirection::Asc => cmp,
            SortDirection::Desc => cmp.reverse(),
        }
    });
    ordered
}

fn compare_values(a: &SortValue, b: &SortValue) -> Ordering {
    a.partial_compare(b).unwrap_or(Ordering::Equal)
}
