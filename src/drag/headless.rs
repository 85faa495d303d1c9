use crate::drag::controller::{DragController, Point, PreviewId, PreviewRequest};
use crate::error::{GridError, Result};
use std::collections::BTreeMap;

/// In-memory [`DragController`] that keeps a ledger of what a browser
/// implementation would have attached to the document.
#[derive(Debug, Default)]
pub struct RecordingController {
    next_id: u64,
    previews: BTreeMap<PreviewId, Point>,
    listeners: usize,
    ghosts_suppressed: usize,
    tracked: usize,
    ended: usize,
    fail_begin: bool,
}

impl RecordingController {
    /// A controller whose previews can never be built
    pub fn failing() -> Self {
        Self {
            fail_begin: true,
            ..Self::default()
        }
    }

    /// Floating previews currently attached
    pub fn attached_previews(&self) -> usize {
        self.previews.len()
    }

    /// Pointer-move listeners currently registered
    pub fn listeners(&self) -> usize {
        self.listeners
    }

    pub fn ghosts_suppressed(&self) -> usize {
        self.ghosts_suppressed
    }

    /// Number of track calls that hit a live preview
    pub fn tracked(&self) -> usize {
        self.tracked
    }

    /// Number of previews released
    pub fn ended(&self) -> usize {
        self.ended
    }

    pub fn position_of(&self, preview: PreviewId) -> Option<Point> {
        self.previews.get(&preview).copied()
    }
}

impl DragController for RecordingController {
    fn begin(&mut self, request: &PreviewRequest) -> Result<PreviewId> {
        if self.fail_begin {
            return Err(GridError::PreviewUnavailable(request.item_id.clone()));
        }

        self.next_id += 1;
        let id = PreviewId(self.next_id);
        self.previews.insert(id, request.initial_position);
        self.ghosts_suppressed += 1;
        self.listeners += 1;
        Ok(id)
    }

    fn track(&mut self, preview: PreviewId, position: Point) {
        if let Some(current) = self.previews.get_mut(&preview) {
            *current = position;
            self.tracked += 1;
        }
    }

    fn end(&mut self, preview: PreviewId) {
        if self.previews.remove(&preview).is_some() {
            self.listeners = self.listeners.saturating_sub(1);
            self.ended += 1;
        }
    }
}
