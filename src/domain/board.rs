use crate::domain::record::{normalize_group_key, Grouped};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default cursor offset of the floating drag preview, in pixels
pub const DEFAULT_PREVIEW_OFFSET: f64 = 12.0;

/// Configuration for a kanban board column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_label: Option<String>,
}

impl ColumnConfig {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            dot_color: None,
            empty_label: None,
        }
    }

    pub fn with_dot_color(mut self, color: impl Into<String>) -> Self {
        self.dot_color = Some(color.into());
        self
    }

    pub fn with_empty_label(mut self, label: impl Into<String>) -> Self {
        self.empty_label = Some(label.into());
        self
    }
}

/// Board configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub name: String,
    pub columns: Vec<ColumnConfig>,
    #[serde(default = "default_enable_dnd")]
    pub enable_dnd: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default = "default_preview_offset")]
    pub preview_offset: f64,
}

fn default_enable_dnd() -> bool {
    true
}

fn default_preview_offset() -> f64 {
    DEFAULT_PREVIEW_OFFSET
}

impl BoardConfig {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnConfig>) -> Self {
        Self {
            name: name.into(),
            columns,
            enable_dnd: true,
            currency: None,
            preview_offset: DEFAULT_PREVIEW_OFFSET,
        }
    }

    /// Pipeline board for deals, totalled in USD
    pub fn deal_pipeline() -> Self {
        let mut config = Self::new(
            "Deals",
            vec![
                ColumnConfig::new("early-stage", "Early Stage").with_dot_color("gray"),
                ColumnConfig::new("qualified", "Qualified").with_dot_color("blue"),
                ColumnConfig::new("proposal", "Proposal").with_dot_color("indigo"),
                ColumnConfig::new("negotiation", "Negotiation").with_dot_color("amber"),
                ColumnConfig::new("won", "Won")
                    .with_dot_color("green")
                    .with_empty_label("No deals won yet"),
                ColumnConfig::new("lost", "Lost").with_dot_color("red"),
            ],
        );
        config.currency = Some("USD".to_string());
        config
    }

    /// Status board for todos
    pub fn todo_board() -> Self {
        Self::new(
            "Todos",
            vec![
                ColumnConfig::new("todo", "To Do"),
                ColumnConfig::new("in-progress", "In Progress"),
                ColumnConfig::new("done", "Done").with_empty_label("Nothing finished yet"),
            ],
        )
    }

    /// Explicit column order
    pub fn column_order(&self) -> Vec<String> {
        self.columns.iter().map(|col| col.key.clone()).collect()
    }

    /// Gets the column configuration for a group key
    pub fn get_column(&self, key: &str) -> Option<&ColumnConfig> {
        self.columns.iter().find(|col| col.key == key)
    }

    /// Label shown for a group key, falling back to the key itself
    pub fn label_for(&self, key: &str) -> String {
        self.get_column(key)
            .map(|col| col.label.clone())
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::deal_pipeline()
    }
}

/// A derived grouping bucket of records sharing a group key
#[derive(Debug, Clone, PartialEq)]
pub struct Column<'a, T> {
    pub key: String,
    pub label: String,
    pub items: Vec<&'a T>,
    pub total: Option<f64>,
}

impl<'a, T> Column<'a, T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Partitions `records` into ordered columns.
///
/// Every record lands in exactly one column. Keys listed in
/// `explicit_order` come first, in that order, even when empty; the
/// remaining keys follow in ascending order. When `amount_fn` is given
/// each column carries the sum of its items' amounts, with missing or
/// non-finite amounts counted as zero.
pub fn compute_columns<'a, T, K, A>(
    records: &'a [T],
    group_key_fn: K,
    explicit_order: Option<&[String]>,
    amount_fn: Option<A>,
) -> Vec<Column<'a, T>>
where
    K: Fn(&T) -> Option<String>,
    A: Fn(&T) -> Option<f64>,
{
    let mut buckets: BTreeMap<String, Vec<&'a T>> = BTreeMap::new();
    for record in records {
        buckets
            .entry(normalize_group_key(group_key_fn(record)))
            .or_default()
            .push(record);
    }

    let mut keys: Vec<String> = Vec::with_capacity(buckets.len());
    if let Some(order) = explicit_order {
        for key in order {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    // BTreeMap iterates keys in ascending order
    let residual: Vec<String> = buckets
        .keys()
        .filter(|key| !keys.contains(key))
        .cloned()
        .collect();
    keys.extend(residual);

    keys.into_iter()
        .map(|key| {
            let items = buckets.remove(&key).unwrap_or_default();
            let total = amount_fn.as_ref().map(|amount| {
                items
                    .iter()
                    .map(|item| match amount(*item) {
                        Some(value) if value.is_finite() => value,
                        _ => 0.0,
                    })
                    .sum::<f64>()
            });
            Column {
                label: key.clone(),
                key,
                items,
                total,
            }
        })
        .collect()
}

/// Groups records by their [`Grouped`] accessors using the board's order
/// and labels. Totals are computed only when the board has a currency.
pub fn compute_board_columns<'a, T: Grouped>(
    records: &'a [T],
    config: &BoardConfig,
) -> Vec<Column<'a, T>> {
    let order = config.column_order();
    let amount_fn = config.currency.as_ref().map(|_| |record: &T| record.amount());

    let mut columns = compute_columns(
        records,
        |record: &T| record.group_key(),
        Some(order.as_slice()),
        amount_fn,
    );
    for column in &mut columns {
        column.label = config.label_for(&column.key);
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{Identified, RecordKey, UNGROUPED};

    #[derive(Debug, PartialEq)]
    struct Item {
        id: &'static str,
        stage: Option<&'static str>,
        amount: Option<f64>,
    }

    impl Identified for Item {
        fn id(&self) -> Option<RecordKey> {
            Some(RecordKey::from(self.id))
        }
    }

    impl Grouped for Item {
        fn group_key(&self) -> Option<String> {
            self.stage.map(str::to_string)
        }

        fn amount(&self) -> Option<f64> {
            self.amount
        }
    }

    fn item(id: &'static str, stage: Option<&'static str>, amount: Option<f64>) -> Item {
        Item { id, stage, amount }
    }

    fn keys<T>(columns: &[Column<'_, T>]) -> Vec<String> {
        columns.iter().map(|col| col.key.clone()).collect()
    }

    fn by_stage(item: &Item) -> Option<String> {
        item.group_key()
    }

    const NO_AMOUNT: Option<fn(&Item) -> Option<f64>> = None;

    #[test]
    fn test_every_record_lands_in_exactly_one_column() {
        let items = vec![
            item("1", Some("b"), None),
            item("2", Some("a"), None),
            item("3", None, None),
            item("4", Some("b"), None),
        ];

        let columns = compute_columns(&items, by_stage, None, NO_AMOUNT);

        let mut ids: Vec<&str> = columns
            .iter()
            .flat_map(|col| col.items.iter().map(|item| item.id))
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert_eq!(keys(&columns), vec!["Ungrouped", "a", "b"]);
        assert_eq!(columns[2].len(), 2);
    }

    #[test]
    fn test_explicit_order_emits_empty_columns_first() {
        let items = vec![item("1", Some("b"), None)];
        let order = vec!["a".to_string(), "b".to_string()];

        let columns = compute_columns(&items, by_stage, Some(order.as_slice()), NO_AMOUNT);

        assert_eq!(keys(&columns), vec!["a", "b"]);
        assert!(columns[0].is_empty());
        assert_eq!(columns[1].items[0].id, "1");
    }

    #[test]
    fn test_residual_keys_appended_alphabetically() {
        let items = vec![
            item("1", Some("zeta"), None),
            item("2", Some("won"), None),
            item("3", Some("alpha"), None),
        ];
        let order = vec!["won".to_string()];

        let columns = compute_columns(&items, by_stage, Some(order.as_slice()), NO_AMOUNT);

        assert_eq!(keys(&columns), vec!["won", "alpha", "zeta"]);
    }

    #[test]
    fn test_totals_treat_missing_amounts_as_zero() {
        let items = vec![
            item("1", Some("won"), Some(100.0)),
            item("2", Some("won"), None),
            item("3", Some("won"), Some(f64::NAN)),
            item("4", Some("won"), Some(50.5)),
        ];

        let columns = compute_columns(&items, by_stage, None, Some(|item: &Item| item.amount));
        assert_eq!(columns[0].total, Some(150.5));

        let untotalled = compute_columns(&items, by_stage, None, NO_AMOUNT);
        assert_eq!(untotalled[0].total, None);
    }

    #[test]
    fn test_empty_records() {
        let items: Vec<Item> = Vec::new();
        assert!(compute_columns(&items, by_stage, None, NO_AMOUNT).is_empty());

        let order = vec!["a".to_string()];
        let columns = compute_columns(&items, by_stage, Some(order.as_slice()), NO_AMOUNT);
        assert_eq!(keys(&columns), vec!["a"]);
    }

    #[test]
    fn test_board_columns_use_config_labels() {
        let items = vec![
            item("1", Some("won"), Some(10.0)),
            item("2", Some("mystery"), Some(5.0)),
            item("3", Some(""), None),
        ];

        let columns = compute_board_columns(&items, &BoardConfig::deal_pipeline());

        assert_eq!(
            keys(&columns),
            vec![
                "early-stage",
                "qualified",
                "proposal",
                "negotiation",
                "won",
                "lost",
                UNGROUPED,
                "mystery"
            ]
        );
        assert_eq!(columns[4].label, "Won");
        assert_eq!(columns[4].total, Some(10.0));
        assert_eq!(columns[7].label, "mystery");
    }

    #[test]
    fn test_board_without_currency_has_no_totals() {
        let items = vec![item("1", Some("todo"), Some(10.0))];
        let columns = compute_board_columns(&items, &BoardConfig::todo_board());
        assert!(columns.iter().all(|col| col.total.is_none()));
    }

    #[test]
    fn test_config_lookup() {
        let config = BoardConfig::default();
        assert_eq!(config.label_for("early-stage"), "Early Stage");
        assert_eq!(config.label_for("unknown"), "unknown");
        assert_eq!(
            config.get_column("won").and_then(|col| col.empty_label.clone()),
            Some("No deals won yet".to_string())
        );
    }
}
