use std::collections::HashMap;

/// Data-transfer format carrying the dragged record's id
pub const ITEM_ID_FORMAT: &str = "text/x-item-id";

/// Data-transfer format carrying the source column key
pub const SOURCE_COLUMN_FORMAT: &str = "text/x-source-column";

/// String key/value channel travelling with a native drag
pub trait DataTransfer {
    fn set_data(&mut self, format: &str, value: &str);
    fn get_data(&self, format: &str) -> Option<String>;
}

impl DataTransfer for HashMap<String, String> {
    fn set_data(&mut self, format: &str, value: &str) {
        self.insert(format.to_string(), value.to_string());
    }

    fn get_data(&self, format: &str) -> Option<String> {
        self.get(format).cloned()
    }
}

/// The two values written on drag start and read back on drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub item_id: String,
    pub source_column: String,
}

impl DragPayload {
    pub fn new(item_id: impl Into<String>, source_column: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            source_column: source_column.into(),
        }
    }

    pub fn write<D: DataTransfer + ?Sized>(&self, transfer: &mut D) {
        transfer.set_data(ITEM_ID_FORMAT, &self.item_id);
        transfer.set_data(SOURCE_COLUMN_FORMAT, &self.source_column);
    }

    /// Reads the payload back, or `None` unless both values are present
    /// and non-empty
    pub fn read<D: DataTransfer + ?Sized>(transfer: &D) -> Option<Self> {
        let item_id = transfer.get_data(ITEM_ID_FORMAT).filter(|v| !v.is_empty())?;
        let source_column = transfer
            .get_data(SOURCE_COLUMN_FORMAT)
            .filter(|v| !v.is_empty())?;
        Some(Self {
            item_id,
            source_column,
        })
    }
}
