use reelcut_core::error::{CoreError, Result};
use reelcut_core::history::{
    DeleteItemCommand, History, InsertItemCommand, MoveItemCommand, ResizeItemCommand,
};
use reelcut_core::selection::SelectionState;
use reelcut_core::snapping::{collect_snap_points, find_snap_point};
use reelcut_core::types::{Composition, Frames, Item};
use serde::Serialize;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::convert::pixels_to_time;
use crate::zoom::ZoomState;

/// Pointer distance within which a dragged edge sticks to a neighbor edge.
pub const SNAP_THRESHOLD_PX: f64 = 8.0;

const HISTORY_DEPTH: usize = 128;

/// Which edge of a clip a resize gesture grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeEdge {
    Start,
    End,
}

/// The uncommitted result of an in-flight gesture, for overlay rendering.
/// Nothing in the model changes until the gesture commits on pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GesturePreview {
    pub track_index: usize,
    pub from: Frames,
    pub duration_in_frames: Frames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Idle,
    Dragging {
        item_id: Uuid,
        origin_track: usize,
        origin_from: Frames,
        duration: Frames,
    },
    Resizing {
        item_id: Uuid,
        edge: ResizeEdge,
        track_index: usize,
        origin_from: Frames,
        origin_duration: Frames,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GestureKind {
    None,
    Dragging,
    Resizing,
}

/// Owns the composition, selection, zoom state, and the transient gesture,
/// and turns pointer deltas into model mutations.
///
/// Pointer-move events only ever update the overlay preview; the single
/// mutation happens on pointer-up, and a commit that conflicts with a
/// neighbor reverts to the gesture origin instead of surfacing an error.
pub struct TimelineController {
    composition: Composition,
    selection: SelectionState,
    zoom: ZoomState,
    history: History,
    gesture: Gesture,
    preview: Option<GesturePreview>,
    snap_enabled: bool,
}

impl TimelineController {
    pub fn new(composition: Composition) -> Self {
        Self {
            composition,
            selection: SelectionState::new(),
            zoom: ZoomState::new(),
            history: History::new(HISTORY_DEPTH),
            gesture: Gesture::Idle,
            preview: None,
            snap_enabled: true,
        }
    }

    // -- read access ---------------------------------------------------------

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn preview(&self) -> Option<&GesturePreview> {
        self.preview.as_ref()
    }

    pub fn gesture_kind(&self) -> GestureKind {
        match self.gesture {
            Gesture::Idle => GestureKind::None,
            Gesture::Dragging { .. } => GestureKind::Dragging,
            Gesture::Resizing { .. } => GestureKind::Resizing,
        }
    }

    pub fn gesture_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }

    fn fps(&self) -> f64 {
        self.composition.settings.fps
    }

    // -- selection -----------------------------------------------------------

    pub fn select_at(&mut self, track_index: usize, item_index: usize) {
        self.selection
            .select_at(&self.composition, track_index, item_index);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Delete the selected item and clear the selection. A selection that no
    /// longer resolves is cleared and reported as stale.
    pub fn delete_selected(&mut self) -> Result<()> {
        let Some(id) = self.selection.selected_id() else {
            return Err(CoreError::StaleSelection);
        };
        if self.composition.locate_item(id).is_none() {
            self.selection.clear();
            return Err(CoreError::StaleSelection);
        }
        self.history
            .execute(Box::new(DeleteItemCommand::new(id)), &mut self.composition)?;
        self.selection.clear();
        debug!(item = %id, "deleted selected item");
        Ok(())
    }

    // -- editing outside gestures -------------------------------------------

    /// Place an item (e.g. a completed upload) on a track, through history.
    pub fn insert_item(&mut self, track_index: usize, item: Item) -> Result<()> {
        self.history.execute(
            Box::new(InsertItemCommand::new(track_index, item)),
            &mut self.composition,
        )
    }

    pub fn add_track(&mut self, name: impl Into<String>) -> usize {
        self.composition.add_track(name)
    }

    /// Remove a track and everything on it, dropping any selection that
    /// pointed into it.
    pub fn remove_track(&mut self, track_index: usize) -> Result<()> {
        let track = self.composition.remove_track(track_index)?;
        self.selection.prune(&self.composition);
        debug!(track = %track.name, "removed track");
        Ok(())
    }

    pub fn undo(&mut self) -> Result<()> {
        self.history.undo(&mut self.composition)?;
        self.selection.prune(&self.composition);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        self.history.redo(&mut self.composition)?;
        self.selection.prune(&self.composition);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -- zoom ----------------------------------------------------------------

    /// Zoom steps are refused while a gesture is in flight so one gesture
    /// never mixes two pixel/time mappings.
    pub fn zoom_in(&mut self) -> bool {
        if self.gesture_active() {
            debug!("zoom-in refused mid-gesture");
            return false;
        }
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        if self.gesture_active() {
            debug!("zoom-out refused mid-gesture");
            return false;
        }
        self.zoom.zoom_out()
    }

    // -- drag gesture --------------------------------------------------------

    /// Pointer-down over an item: capture its position as the gesture origin.
    /// Bad indices indicate a caller bug and surface as an error.
    pub fn begin_drag(&mut self, track_index: usize, item_index: usize) -> Result<()> {
        self.abandon_stale_gesture();
        let item = self.composition.item_at(track_index, item_index)?;
        let item_id = item.id();
        let origin_from = item.from();
        let duration = item.duration_in_frames();

        self.selection.select(item_id);
        self.gesture = Gesture::Dragging {
            item_id,
            origin_track: track_index,
            origin_from,
            duration,
        };
        self.preview = Some(GesturePreview {
            track_index,
            from: origin_from,
            duration_in_frames: duration,
        });
        debug!(item = %item_id, track = track_index, "drag started");
        Ok(())
    }

    /// Pointer-move during a drag: recompute the overlay preview from the
    /// cumulative pixel delta. The model is not touched.
    pub fn update_drag(&mut self, delta_x: f64, hover_track: Option<usize>) {
        let Gesture::Dragging {
            item_id,
            origin_track,
            origin_from,
            duration,
        } = self.gesture
        else {
            trace!("drag update ignored: no drag in flight");
            return;
        };

        let delta = pixels_to_time(delta_x, self.fps(), self.zoom.pixels_per_second());
        let mut proposed = (origin_from + delta).max(Frames::ZERO);
        if self.snap_enabled {
            proposed = self.snap_drag(proposed, duration, item_id);
        }

        let last = self.composition.tracks.len().saturating_sub(1);
        let track_index = hover_track.map(|t| t.min(last)).unwrap_or(origin_track);

        self.preview = Some(GesturePreview {
            track_index,
            from: proposed,
            duration_in_frames: duration,
        });
    }

    /// Pointer-up: commit the previewed move. Returns false when the commit
    /// was rejected and the item stays at its origin.
    pub fn end_drag(&mut self) -> bool {
        let Gesture::Dragging {
            item_id,
            origin_track,
            origin_from,
            ..
        } = self.gesture
        else {
            trace!("drag end ignored: no drag in flight");
            return false;
        };
        let preview = self.preview.take();
        self.gesture = Gesture::Idle;

        let Some(preview) = preview else {
            return false;
        };
        if preview.track_index == origin_track && preview.from == origin_from {
            return true;
        }

        let result = self.history.execute(
            Box::new(MoveItemCommand::new(
                item_id,
                preview.track_index,
                preview.from,
            )),
            &mut self.composition,
        );
        match result {
            Ok(()) => {
                debug!(item = %item_id, track = preview.track_index, from = %preview.from, "drag committed");
                true
            }
            Err(CoreError::Overlap) => {
                debug!(item = %item_id, "drag overlapped a neighbor; reverted");
                false
            }
            Err(e) => {
                warn!(item = %item_id, error = %e, "drag commit failed; reverted");
                false
            }
        }
    }

    // -- resize gesture ------------------------------------------------------

    pub fn begin_resize(
        &mut self,
        track_index: usize,
        item_index: usize,
        edge: ResizeEdge,
    ) -> Result<()> {
        self.abandon_stale_gesture();
        let item = self.composition.item_at(track_index, item_index)?;
        let item_id = item.id();
        let origin_from = item.from();
        let origin_duration = item.duration_in_frames();

        self.selection.select(item_id);
        self.gesture = Gesture::Resizing {
            item_id,
            edge,
            track_index,
            origin_from,
            origin_duration,
        };
        self.preview = Some(GesturePreview {
            track_index,
            from: origin_from,
            duration_in_frames: origin_duration,
        });
        debug!(item = %item_id, ?edge, "resize started");
        Ok(())
    }

    /// Pointer-move during a resize: clamp so the clip keeps at least one
    /// frame and never starts before frame zero, then update the preview.
    pub fn update_resize(&mut self, delta_x: f64) {
        let Gesture::Resizing {
            edge,
            track_index,
            origin_from,
            origin_duration,
            ..
        } = self.gesture
        else {
            trace!("resize update ignored: no resize in flight");
            return;
        };

        let delta = pixels_to_time(delta_x, self.fps(), self.zoom.pixels_per_second());
        let origin_end = origin_from + origin_duration;
        let (from, duration) = match edge {
            ResizeEdge::Start => {
                let from = (origin_from + delta)
                    .max(Frames::ZERO)
                    .min(origin_end - Frames::ONE);
                (from, origin_end - from)
            }
            ResizeEdge::End => (origin_from, (origin_duration + delta).max(Frames::ONE)),
        };

        self.preview = Some(GesturePreview {
            track_index,
            from,
            duration_in_frames: duration,
        });
    }

    pub fn end_resize(&mut self) -> bool {
        let Gesture::Resizing {
            item_id,
            origin_from,
            origin_duration,
            ..
        } = self.gesture
        else {
            trace!("resize end ignored: no resize in flight");
            return false;
        };
        let preview = self.preview.take();
        self.gesture = Gesture::Idle;

        let Some(preview) = preview else {
            return false;
        };
        if preview.from == origin_from && preview.duration_in_frames == origin_duration {
            return true;
        }

        let result = self.history.execute(
            Box::new(ResizeItemCommand::new(
                item_id,
                preview.from,
                preview.duration_in_frames,
            )),
            &mut self.composition,
        );
        match result {
            Ok(()) => {
                debug!(item = %item_id, from = %preview.from, duration = %preview.duration_in_frames, "resize committed");
                true
            }
            Err(CoreError::Overlap) => {
                debug!(item = %item_id, "resize overlapped a neighbor; reverted");
                false
            }
            Err(e) => {
                warn!(item = %item_id, error = %e, "resize commit failed; reverted");
                false
            }
        }
    }

    // -- cancellation --------------------------------------------------------

    /// Abandon any in-flight gesture (escape key, pointer leaving the
    /// surface). The overlay is discarded and the model stays untouched.
    pub fn cancel_gesture(&mut self) {
        if self.gesture_active() {
            debug!("gesture cancelled");
        }
        self.gesture = Gesture::Idle;
        self.preview = None;
    }

    // -- internals -----------------------------------------------------------

    fn abandon_stale_gesture(&mut self) {
        if self.gesture_active() {
            debug!("pointer-down with a gesture still in flight; abandoning it");
            self.gesture = Gesture::Idle;
            self.preview = None;
        }
    }

    /// Stick either edge of the dragged span to a nearby item edge.
    fn snap_drag(&self, proposed: Frames, duration: Frames, item_id: Uuid) -> Frames {
        let threshold =
            pixels_to_time(SNAP_THRESHOLD_PX, self.fps(), self.zoom.pixels_per_second())
                .max(Frames::ONE);
        let points = collect_snap_points(&self.composition, Some(item_id));

        let snapped = find_snap_point(proposed, &points, threshold);
        if snapped != proposed {
            return snapped.max(Frames::ZERO);
        }
        let end = proposed + duration;
        let snapped_end = find_snap_point(end, &points, threshold);
        if snapped_end != end {
            return (snapped_end - duration).max(Frames::ZERO);
        }
        proposed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
