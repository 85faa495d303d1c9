use crate::domain::record::{record_key, Identified, RecordKey};
use std::collections::BTreeSet;

/// Selection emitted to the caller after every change
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange<'a, T> {
    pub keys: Vec<RecordKey>,
    pub records: Vec<&'a T>,
}

/// Set of record keys currently checked in a table.
///
/// `all_selected` and `some_selected` are never stored; they are computed
/// against the record list passed in. Keys of records that disappeared
/// never count as selected rows, and until [`SelectionSet::reconcile`]
/// prunes them they also keep the header from reading as fully checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    keys: BTreeSet<RecordKey>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &RecordKey) -> bool {
        self.keys.contains(key)
    }

    /// Number of stored keys, including stale ones not yet reconciled
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Flips membership of `key` and reports the resulting selection
    pub fn toggle_row<'a, T: Identified>(
        &mut self,
        key: &RecordKey,
        records: &'a [T],
    ) -> SelectionChange<'a, T> {
        if !self.keys.remove(key) {
            self.keys.insert(key.clone());
        }
        self.change(records)
    }

    /// Selects every visible record, or none
    pub fn toggle_all<'a, T: Identified>(
        &mut self,
        checked: bool,
        records: &'a [T],
    ) -> SelectionChange<'a, T> {
        self.keys.clear();
        if checked {
            self.keys.extend(
                records
                    .iter()
                    .enumerate()
                    .map(|(index, record)| record_key(record, index)),
            );
        }
        self.change(records)
    }

    /// Number of `records` whose key is selected
    pub fn selected_count<T: Identified>(&self, records: &[T]) -> usize {
        records
            .iter()
            .enumerate()
            .filter(|(index, record)| self.keys.contains(&record_key(*record, *index)))
            .count()
    }

    pub fn all_selected<T: Identified>(&self, records: &[T]) -> bool {
        !records.is_empty()
            && self.keys.len() == records.len()
            && self.selected_count(records) == records.len()
    }

    pub fn some_selected<T: Identified>(&self, records: &[T]) -> bool {
        self.selected_count(records) > 0 && !self.all_selected(records)
    }

    /// Drops keys that no longer belong to any of `records`
    pub fn reconcile<T: Identified>(&mut self, records: &[T]) {
        let current: BTreeSet<RecordKey> = records
            .iter()
            .enumerate()
            .map(|(index, record)| record_key(record, index))
            .collect();
        self.keys.retain(|key| current.contains(key));
    }

    fn change<'a, T: Identified>(&self, records: &'a [T]) -> SelectionChange<'a, T> {
        let mut keys = Vec::new();
        let mut selected = Vec::new();
        for (index, record) in records.iter().enumerate() {
            let key = record_key(record, index);
            if self.keys.contains(&key) {
                keys.push(key);
                selected.push(record);
            }
        }
        SelectionChange {
            keys,
            records: selected,
        }
    }
}
