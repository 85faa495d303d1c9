use crate::domain::record::{record_key, Identified, RecordKey, Sortable};
use crate::domain::selection::{SelectionChange, SelectionSet};
use crate::domain::sorting::{apply_sort, toggle_sort, SortSpec, SortValue, TableColumn};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Table configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    pub columns: Vec<TableColumn>,
    #[serde(default)]
    pub selectable: bool,
    #[serde(default)]
    pub sticky_actions: bool,
}

impl TableConfig {
    /// Deal list with a checkbox column and sticky actions
    pub fn deal_list() -> Self {
        Self {
            columns: vec![
                TableColumn::new("name", "Name").sortable(),
                TableColumn::new("company", "Company").sortable(),
                TableColumn::new("stage", "Stage").sortable(),
                TableColumn::new("amount", "Amount").sortable(),
                TableColumn::new("updated_at", "Last Activity").sortable(),
                TableColumn::new("actions", ""),
            ],
            selectable: true,
            sticky_actions: true,
        }
    }

    pub fn get_column(&self, key: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|col| col.key == key)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::deal_list()
    }
}

/// Horizontal scroll geometry of the table container
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_width: f64,
    pub client_width: f64,
    pub scroll_left: f64,
}

impl ScrollMetrics {
    /// The sticky action column casts a shadow while more content remains
    /// to its right
    pub fn shows_sticky_shadow(&self) -> bool {
        self.scroll_width - self.client_width - self.scroll_left > 1.0
    }
}

/// One rendered row
#[derive(Debug, Clone, PartialEq)]
pub struct RowView<'a, T> {
    pub key: RecordKey,
    pub index: usize,
    pub record: &'a T,
    pub checked: bool,
}

/// State of the header checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderCheckbox {
    pub all_selected: bool,
    pub some_selected: bool,
}

/// Reported when a row is clicked
#[derive(Debug, Clone, PartialEq)]
pub struct RowClick<'a, T> {
    pub key: RecordKey,
    pub index: usize,
    pub record: &'a T,
}

/// A record paired with its position in the caller's slice
struct Indexed<'a, T> {
    index: usize,
    record: &'a T,
}

impl<T: Sortable> Sortable for Indexed<'_, T> {
    fn sort_value(&self, key: &str) -> SortValue {
        self.record.sort_value(key)
    }
}

/// Sortable, selectable table host.
///
/// Rows are keyed by their position in the record slice passed in, so
/// sorting never changes which key a positional row carries.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    config: TableConfig,
    sort: Option<SortSpec>,
    selection: SelectionSet,
    sticky_shadow: bool,
}

impl TableView {
    pub fn new(config: TableConfig) -> Self {
        Self {
            config,
            sort: None,
            selection: SelectionSet::new(),
            sticky_shadow: false,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Header click on `column_key`; unknown and unsortable columns are
    /// ignored
    pub fn toggle_sort(&mut self, column_key: &str) -> Option<&SortSpec> {
        if let Some(column) = self.config.get_column(column_key) {
            self.sort = toggle_sort(self.sort.as_ref(), column);
            debug!(column = column_key, sort = ?self.sort, "table sort changed");
        }
        self.sort.as_ref()
    }

    /// Rows of `records` in display order
    pub fn rows<'a, T: Identified + Sortable>(&self, records: &'a [T]) -> Vec<RowView<'a, T>> {
        let indexed: Vec<Indexed<'a, T>> = records
            .iter()
            .enumerate()
            .map(|(index, record)| Indexed { index, record })
            .collect();

        apply_sort(&indexed, self.sort.as_ref())
            .into_iter()
            .map(|entry| {
                let key = record_key(entry.record, entry.index);
                RowView {
                    checked: self.config.selectable && self.selection.contains(&key),
                    key,
                    index: entry.index,
                    record: entry.record,
                }
            })
            .collect()
    }

    pub fn toggle_row<'a, T: Identified>(
        &mut self,
        key: &RecordKey,
        records: &'a [T],
    ) -> SelectionChange<'a, T> {
        self.selection.toggle_row(key, records)
    }

    /// Header checkbox: select every visible row, or none
    pub fn toggle_all<'a, T: Identified>(
        &mut self,
        checked: bool,
        records: &'a [T],
    ) -> SelectionChange<'a, T> {
        self.selection.toggle_all(checked, records)
    }

    /// Header checkbox flags, recomputed against `records` on every call
    pub fn header_state<T: Identified>(&self, records: &[T]) -> HeaderCheckbox {
        HeaderCheckbox {
            all_selected: self.selection.all_selected(records),
            some_selected: self.selection.some_selected(records),
        }
    }

    /// Prunes selected keys that no longer match a record
    pub fn reconcile<T: Identified>(&mut self, records: &[T]) {
        self.selection.reconcile(records);
    }

    pub fn row_click<'a, T: Identified>(&self, record: &'a T, index: usize) -> RowClick<'a, T> {
        RowClick {
            key: record_key(record, index),
            index,
            record,
        }
    }

    /// Updates the sticky column shadow, returning the new flag
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        self.sticky_shadow = self.config.sticky_actions && metrics.shows_sticky_shadow();
        self.sticky_shadow
    }

    pub fn sticky_shadow(&self) -> bool {
        self.sticky_shadow
    }
}
