pub mod board;
pub mod table;

pub use board::{format_currency, BoardView, CardView, ColumnHeader, ColumnView};
pub use table::{HeaderCheckbox, RowClick, RowView, ScrollMetrics, TableConfig, TableView};
