use crate::domain::board::DEFAULT_PREVIEW_OFFSET;
use crate::drag::controller::{DragController, Point, PreviewId, PreviewRequest, Rect, OFFSCREEN};
use crate::drag::payload::{DataTransfer, DragPayload};
use crate::error::{GridError, Result};
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::collections::BTreeSet;
use std::future::Future;
use tracing::{debug, warn};

/// A record dropped into a different column than the one it left
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveIntent {
    pub item_id: String,
    pub from_key: String,
    pub to_key: String,
}

/// Answer to a drag-over on a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Allow,
}

/// Observable lifecycle phase of the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
}

/// The one in-progress gesture
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub item_id: String,
    pub source_column: String,
    pub preview: PreviewId,
    pub offset: f64,
}

/// Owns the single live drag session of a board.
///
/// ```text
/// Idle -> Dragging -> {Dropped, Cancelled} -> Idle
/// ```
///
/// Starting a gesture while one is live tears the old one down first.
/// Every exit path (drop, drag end, cancel) releases the preview and the
/// pointer listener through [`DragController::end`].
pub struct DragSessionManager<C: DragController> {
    controller: RefCell<C>,
    session: RefCell<Option<DragSession>>,
    in_flight: RefCell<BTreeSet<String>>,
    preview_offset: f64,
}

/// Releases an item's in-flight mark however its move handler finishes
struct InFlightGuard<'a> {
    in_flight: &'a RefCell<BTreeSet<String>>,
    item_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.borrow_mut().remove(&self.item_id);
    }
}

impl<C: DragController> DragSessionManager<C> {
    pub fn new(controller: C) -> Self {
        Self::with_offset(controller, DEFAULT_PREVIEW_OFFSET)
    }

    pub fn with_offset(controller: C, preview_offset: f64) -> Self {
        Self {
            controller: RefCell::new(controller),
            session: RefCell::new(None),
            in_flight: RefCell::new(BTreeSet::new()),
            preview_offset: preview_offset.max(0.0),
        }
    }

    pub fn controller(&self) -> Ref<'_, C> {
        self.controller.borrow()
    }

    pub fn phase(&self) -> DragPhase {
        if self.session.borrow().is_some() {
            DragPhase::Dragging
        } else {
            DragPhase::Idle
        }
    }

    /// Snapshot of the live session, if any
    pub fn session(&self) -> Option<DragSession> {
        self.session.borrow().clone()
    }

    /// Whether any move handler is still awaiting its result
    pub fn is_moving(&self) -> bool {
        !self.in_flight.borrow().is_empty()
    }

    /// Whether a move of `item_id` is still awaiting its result
    pub fn is_moving_item(&self, item_id: &str) -> bool {
        self.in_flight.borrow().contains(item_id)
    }

    /// Starts a gesture for `item_id` leaving `source_column`.
    ///
    /// Writes the drag payload to `transfer`, parks the preview off-screen
    /// and records the session. If the controller cannot build a preview
    /// the manager stays idle.
    pub fn on_drag_start<D: DataTransfer + ?Sized>(
        &self,
        item_id: &str,
        source_column: &str,
        source_rect: Rect,
        transfer: &mut D,
    ) -> Result<()> {
        if self.phase() == DragPhase::Dragging {
            warn!(item_id, "drag started while another session was live, tearing it down");
            self.teardown();
        }

        DragPayload::new(item_id, source_column).write(transfer);

        let request = PreviewRequest {
            item_id: item_id.to_string(),
            source_rect,
            initial_position: OFFSCREEN,
        };
        let preview = self.controller.borrow_mut().begin(&request)?;
        let offset = self.preview_offset.min(source_rect.width.max(0.0) / 4.0);

        debug!(item_id, source_column, %preview, offset, "drag session started");
        *self.session.borrow_mut() = Some(DragSession {
            item_id: item_id.to_string(),
            source_column: source_column.to_string(),
            preview,
            offset,
        });
        Ok(())
    }

    /// Repositions the preview so the cursor sits `offset` pixels inside
    /// its top-left corner. Ignored when idle.
    pub fn on_pointer_move(&self, pointer: Point) {
        let session = self.session.borrow();
        if let Some(session) = session.as_ref() {
            let position = Point::new(pointer.x - session.offset, pointer.y - session.offset);
            self.controller.borrow_mut().track(session.preview, position);
        }
    }

    /// Columns always accept drops; this never touches session state
    pub fn on_drag_over_column(&self, _column_key: &str) -> DropEffect {
        DropEffect::Allow
    }

    /// Ends the gesture on a drop over `target_column`.
    ///
    /// Returns the move intent when the payload is complete, a session was
    /// live and the target differs from the source. Any other drop is
    /// ignored without error.
    pub fn on_drop<D: DataTransfer + ?Sized>(
        &self,
        target_column: &str,
        transfer: &D,
    ) -> Option<MoveIntent> {
        let live = self.teardown();

        let Some(payload) = DragPayload::read(transfer) else {
            debug!(target_column, "ignoring drop with incomplete payload");
            return None;
        };
        if !live {
            debug!(
                item_id = %payload.item_id,
                target_column,
                "ignoring drop without a live session"
            );
            return None;
        }
        if payload.source_column == target_column {
            debug!(item_id = %payload.item_id, target_column, "dropped on source column");
            return None;
        }

        Some(MoveIntent {
            item_id: payload.item_id,
            from_key: payload.source_column,
            to_key: target_column.to_string(),
        })
    }

    /// Drops and hands the resulting intent to `handler`.
    ///
    /// The session is always torn down first. While a handler for an item
    /// is pending, further drops of that same item are ignored, so a drop
    /// delivered to both the column and the card list moves the record only
    /// once; drops of other items go through. A handler error comes back as
    /// [`GridError::MoveRejected`] and the caller is expected to revert
    /// whatever it applied optimistically.
    pub async fn drop_with<D, F, Fut>(
        &self,
        target_column: &str,
        transfer: &D,
        handler: F,
    ) -> Result<Option<MoveIntent>>
    where
        D: DataTransfer + ?Sized,
        F: FnOnce(MoveIntent) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let Some(intent) = self.on_drop(target_column, transfer) else {
            return Ok(None);
        };

        if !self.in_flight.borrow_mut().insert(intent.item_id.clone()) {
            debug!(
                item_id = %intent.item_id,
                target_column,
                "move of this item already in flight, ignoring drop"
            );
            return Ok(None);
        }
        let _guard = InFlightGuard {
            in_flight: &self.in_flight,
            item_id: intent.item_id.clone(),
        };

        match handler(intent.clone()).await {
            Ok(()) => Ok(Some(intent)),
            Err(source) => {
                warn!(
                    item_id = %intent.item_id,
                    from = %intent.from_key,
                    to = %intent.to_key,
                    error = %source,
                    "move rejected"
                );
                Err(GridError::MoveRejected {
                    item_id: intent.item_id,
                    from: intent.from_key,
                    to: intent.to_key,
                    source,
                })
            }
        }
    }

    /// Native drag end or external cancellation
    pub fn on_drag_end(&self) {
        if self.teardown() {
            debug!("drag session cancelled");
        }
    }

    /// Releases the live session, returning whether there was one.
    /// Calling it while idle is a no-op.
    pub fn teardown(&self) -> bool {
        let session = self.session.borrow_mut().take();
        match session {
            Some(session) => {
                self.controller.borrow_mut().end(session.preview);
                true
            }
            None => false,
        }
    }
}

impl<C: DragController> Drop for DragSessionManager<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
