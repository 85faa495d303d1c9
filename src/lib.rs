//! # GridView Core
//!
//! Headless logic behind the CRM admin views: a drag-and-drop kanban
//! board, a sortable and selectable data table, and the per-feature record
//! stores that feed them.
//!
//! Nothing here renders. Hosts hand in records and pointer events and get
//! back laid-out columns, table rows and move intents; the platform side
//! (preview overlays, listeners) plugs in through [`drag::DragController`].

pub mod config;
pub mod domain;
pub mod drag;
pub mod error;
pub mod storage;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use config::ViewConfig;
pub use domain::{
    board::{compute_columns, BoardConfig, Column, ColumnConfig},
    deal::{Deal, DealStage},
    record::{Grouped, Identified, RecordKey, Regroupable, Searchable, Sortable, UNGROUPED},
    sorting::{SortDirection, SortSpec, TableColumn},
    todo::{Todo, TodoStatus},
};
pub use drag::{DragController, DragSessionManager, MoveIntent};
pub use error::{GridError, Result};
pub use storage::RecordStore;
pub use store::{FeatureStore, GroupSummary};
pub use view::{BoardView, TableConfig, TableView};
