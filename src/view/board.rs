use crate::domain::board::{compute_columns, BoardConfig};
use crate::domain::record::{normalize_group_key, record_key, Grouped, RecordKey};
use crate::drag::{
    DataTransfer, DragController, DragSessionManager, DropEffect, MoveIntent, Point, Rect,
};
use crate::error::Result;
use std::future::Future;

/// Header of one board column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnHeader {
    pub label: String,
    pub count: usize,
    pub total: Option<String>,
    pub dot_color: Option<String>,
}

/// A card as laid out in its column
#[derive(Debug, Clone, PartialEq)]
pub struct CardView<'a, T> {
    pub key: RecordKey,
    pub record: &'a T,
}

/// One rendered board section
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView<'a, T> {
    pub key: String,
    pub header: ColumnHeader,
    pub cards: Vec<CardView<'a, T>>,
    pub empty_label: Option<String>,
}

/// Kanban board host: grouping, headers and drag wiring.
///
/// The board never owns records; every render takes the full record set
/// and recomputes the columns from each record's current group key.
pub struct BoardView<C: DragController> {
    config: BoardConfig,
    drag: DragSessionManager<C>,
}

impl<C: DragController> BoardView<C> {
    pub fn new(config: BoardConfig, controller: C) -> Self {
        let drag = DragSessionManager::with_offset(controller, config.preview_offset);
        Self { config, drag }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn drag(&self) -> &DragSessionManager<C> {
        &self.drag
    }

    pub fn dnd_enabled(&self) -> bool {
        self.config.enable_dnd
    }

    /// Lays out `records` into the configured columns
    pub fn columns<'a, T: Grouped>(&self, records: &'a [T]) -> Vec<ColumnView<'a, T>> {
        // positional keys follow the record's place in the full set
        let indexed: Vec<(usize, &'a T)> = records.iter().enumerate().collect();
        let order = self.config.column_order();
        let amount_fn = self
            .config
            .currency
            .as_ref()
            .map(|_| |entry: &(usize, &'a T)| entry.1.amount());

        compute_columns(
            &indexed,
            |entry: &(usize, &'a T)| entry.1.group_key(),
            Some(order.as_slice()),
            amount_fn,
        )
        .into_iter()
        .map(|column| {
            let column_config = self.config.get_column(&column.key);
            let total = match (&self.config.currency, column.total) {
                (Some(currency), Some(total)) => Some(format_currency(total, currency)),
                _ => None,
            };
            let cards = column
                .items
                .iter()
                .map(|&&(index, record)| CardView {
                    key: record_key(record, index),
                    record,
                })
                .collect();

            ColumnView {
                header: ColumnHeader {
                    label: self.config.label_for(&column.key),
                    count: column.len(),
                    total,
                    dot_color: column_config.and_then(|c| c.dot_color.clone()),
                },
                empty_label: column_config.and_then(|c| c.empty_label.clone()),
                key: column.key,
                cards,
            }
        })
        .collect()
    }

    /// Starts dragging `record`, found at `index` in the rendered set.
    /// Returns `false` without touching the controller when drag and drop
    /// is disabled.
    pub fn start_drag<T: Grouped, D: DataTransfer + ?Sized>(
        &self,
        record: &T,
        index: usize,
        source_rect: Rect,
        transfer: &mut D,
    ) -> Result<bool> {
        if !self.config.enable_dnd {
            return Ok(false);
        }
        let item_id = record_key(record, index);
        let source_column = normalize_group_key(record.group_key());
        self.drag
            .on_drag_start(item_id.as_str(), &source_column, source_rect, transfer)?;
        Ok(true)
    }

    pub fn pointer_moved(&self, pointer: Point) {
        if self.config.enable_dnd {
            self.drag.on_pointer_move(pointer);
        }
    }

    pub fn drag_over(&self, column_key: &str) -> Option<DropEffect> {
        self.config
            .enable_dnd
            .then(|| self.drag.on_drag_over_column(column_key))
    }

    pub fn drop_on<D: DataTransfer + ?Sized>(
        &self,
        column_key: &str,
        transfer: &D,
    ) -> Option<MoveIntent> {
        if !self.config.enable_dnd {
            return None;
        }
        self.drag.on_drop(column_key, transfer)
    }

    /// Drops on `column_key` and awaits `on_item_move` for the intent
    pub async fn drop_with<D, F, Fut>(
        &self,
        column_key: &str,
        transfer: &D,
        on_item_move: F,
    ) -> Result<Option<MoveIntent>>
    where
        D: DataTransfer + ?Sized,
        F: FnOnce(MoveIntent) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        if !self.config.enable_dnd {
            return Ok(None);
        }
        self.drag.drop_with(column_key, transfer, on_item_move).await
    }

    pub fn end_drag(&self) {
        self.drag.on_drag_end();
    }
}

/// Formats a column total as a whole-unit currency amount
pub fn format_currency(amount: f64, currency: &str) -> String {
    let symbol = match currency.to_uppercase().as_str() {
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "ZAR" => "R".to_string(),
        other => format!("{other} "),
    };

    // an overflowed column sum renders as the largest finite amount
    let amount = if amount.is_nan() {
        0.0
    } else {
        amount.clamp(-f64::MAX, f64::MAX)
    };
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{symbol}{grouped}")
    } else {
        format!("{symbol}{grouped}")
    }
}
