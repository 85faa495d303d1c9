use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a preview is parked before the first pointer move
pub const OFFSCREEN: Point = Point {
    x: -10_000.0,
    y: -10_000.0,
};

/// A position in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box of the dragged card
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Handle of a floating preview attached by a [`DragController`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewId(pub u64);

impl fmt::Display for PreviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview-{}", self.0)
    }
}

/// What the controller needs to build the floating preview
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRequest {
    pub item_id: String,
    pub source_rect: Rect,
    pub initial_position: Point,
}

/// Platform side of a drag gesture.
///
/// A browser implementation clones the source card into a full-opacity
/// overlay with pointer events disabled, swaps the native drag ghost for a
/// 1x1 transparent placeholder and registers a document-level pointer-move
/// listener. Everything attached by `begin` must be released by `end`.
pub trait DragController {
    /// Attaches the preview at `request.initial_position` and starts
    /// listening for pointer moves
    fn begin(&mut self, request: &PreviewRequest) -> Result<PreviewId>;

    /// Moves the preview's top-left corner to `position`
    fn track(&mut self, preview: PreviewId, position: Point);

    /// Detaches the preview and its listener. Unknown handles are ignored.
    fn end(&mut self, preview: PreviewId);
}
