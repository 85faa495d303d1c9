pub mod board;
pub mod deal;
pub mod record;
pub mod selection;
pub mod sorting;
pub mod todo;

pub use board::{compute_board_columns, compute_columns, BoardConfig, Column, ColumnConfig};
pub use deal::{Deal, DealId, DealStage};
pub use record::{Grouped, Identified, RecordKey, Regroupable, Searchable, Sortable, UNGROUPED};
pub use selection::{SelectionChange, SelectionSet};
pub use sorting::{apply_sort, toggle_sort, SortDirection, SortSpec, SortValue, TableColumn};
pub use todo::{Todo, TodoId, TodoStatus};
