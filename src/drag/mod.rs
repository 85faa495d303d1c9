//! Drag-and-drop session handling for the board.
//!
//! The platform specifics (overlay element, ghost image, document
//! listeners) live behind [`DragController`]; the manager only decides
//! when a gesture starts, where the preview goes and which drops become
//! move intents.

pub mod controller;
pub mod headless;
pub mod payload;
pub mod session;

pub use controller::{DragController, Point, PreviewId, PreviewRequest, Rect};
pub use headless::RecordingController;
pub use payload::{DataTransfer, DragPayload};
pub use session::{DragPhase, DragSession, DragSessionManager, DropEffect, MoveIntent};
