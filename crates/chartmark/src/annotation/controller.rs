//! Tool controller: anchor collection, selection, dragging, context menu.
//!
//! All pointer and keyboard handling runs synchronously through this one
//! controller, so a renderer only ever observes states committed between
//! events. The interaction mode is a single tagged state: an annotation
//! cannot be mid-collection and mid-drag at the same time by construction.

use chartmark_core::{Bar, DataPoint};

use crate::coords::{CoordinateMapper, ScreenPos};

use super::hit::{anchor_hit, topmost_hit};
use super::snap::snap_to_ohlc;
use super::store::AnnotationStore;
use super::types::{Annotation, AnnotationId, AnnotationKind, Arity};

/// Pointer travel below this threshold does not add brush anchors.
const BRUSH_MIN_DISTANCE: f32 = 5.0;

/// Drag mode for the active pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragMode {
    /// Whole-annotation translation. `last` is the pixel position the next
    /// delta is measured from; it is re-baselined on every step so the drag
    /// tolerates anchors outside the visible viewport.
    Move { last: ScreenPos },
    /// Single-anchor mutation.
    Resize { anchor: usize },
}

/// Current interaction state.
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Placing anchors for a new annotation. The draft's final anchor tracks
    /// the pointer until a click commits it.
    Collecting { draft: Annotation },
    /// A persisted annotation is being moved or resized.
    Dragging { id: AnnotationId, mode: DragMode },
    /// Right-click menu (copy / delete) is open for an annotation.
    ContextMenu { id: AnnotationId },
}

/// Owns the annotation store, the selection, the magnet toggle and the
/// interaction state machine.
#[derive(Debug, Default)]
pub struct ToolController {
    store: AnnotationStore,
    state: InteractionState,
    tool: Option<AnnotationKind>,
    selected: Option<AnnotationId>,
    magnet: bool,
}

impl ToolController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a tool (or disarm with `None`). Arming discards any in-progress
    /// draft and clears the selection.
    pub fn select_tool(&mut self, kind: Option<AnnotationKind>) {
        self.tool = kind;
        self.state = match kind {
            Some(kind) => {
                self.selected = None;
                log::debug!("tool armed: {}", kind.name());
                InteractionState::Collecting {
                    draft: Annotation::new(kind, Vec::new()),
                }
            }
            None => InteractionState::Idle,
        };
    }

    pub fn tool(&self) -> Option<AnnotationKind> {
        self.tool
    }

    pub fn toggle_magnet(&mut self) {
        self.magnet = !self.magnet;
    }

    pub fn magnet_enabled(&self) -> bool {
        self.magnet
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    /// The annotation id the context menu is open for, if any.
    pub fn context_menu(&self) -> Option<AnnotationId> {
        match self.state {
            InteractionState::ContextMenu { id } => Some(id),
            _ => None,
        }
    }

    /// The in-progress draft, rendered distinctly (e.g. dashed) by the
    /// chart surface.
    pub fn preview(&self) -> Option<&Annotation> {
        match &self.state {
            InteractionState::Collecting { draft } if !draft.anchors.is_empty() => Some(draft),
            _ => None,
        }
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.store.iter()
    }

    /// Add a completed annotation directly, bypassing collection.
    pub fn insert(&mut self, annotation: Annotation) -> AnnotationId {
        self.store.add(annotation)
    }

    /// Left button pressed. Returns whether the event was consumed.
    pub fn handle_press(
        &mut self,
        pos: ScreenPos,
        mapper: &dyn CoordinateMapper,
        bars: &[Bar],
    ) -> bool {
        if matches!(self.state, InteractionState::ContextMenu { .. }) {
            self.state = InteractionState::Idle;
        }
        match std::mem::take(&mut self.state) {
            InteractionState::Collecting { draft } => {
                let Some(point) = self.resolve_magnet(pos, mapper, bars) else {
                    self.state = InteractionState::Collecting { draft };
                    return false;
                };
                self.press_collecting(draft, point);
                true
            }
            InteractionState::Idle => self.press_idle(pos, mapper),
            dragging @ InteractionState::Dragging { .. } => {
                self.state = dragging;
                false
            }
            InteractionState::ContextMenu { .. } => false,
        }
    }

    /// Pointer moved. Live-updates drafts and applies drags.
    pub fn handle_move(
        &mut self,
        pos: ScreenPos,
        mapper: &dyn CoordinateMapper,
        bars: &[Bar],
    ) -> bool {
        match std::mem::take(&mut self.state) {
            InteractionState::Collecting { mut draft } => {
                let changed = self.move_collecting(&mut draft, pos, mapper, bars);
                self.state = InteractionState::Collecting { draft };
                changed
            }
            InteractionState::Dragging { id, mode } => self.move_dragging(id, mode, pos, mapper, bars),
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Left button released: commits a brush stroke, ends any drag.
    pub fn handle_release(&mut self) {
        match std::mem::take(&mut self.state) {
            InteractionState::Collecting { draft }
                if draft.kind == AnnotationKind::Brush && !draft.anchors.is_empty() =>
            {
                self.emit(draft);
            }
            InteractionState::Dragging { .. } => {
                self.state = InteractionState::Idle;
            }
            other => {
                self.state = other;
            }
        }
    }

    /// Right button pressed: open the context menu over a hit annotation.
    pub fn handle_context_press(&mut self, pos: ScreenPos, mapper: &dyn CoordinateMapper) -> bool {
        if !matches!(
            self.state,
            InteractionState::Idle | InteractionState::ContextMenu { .. }
        ) {
            return false;
        }
        match topmost_hit(&self.store, pos, mapper) {
            Some(id) => {
                self.selected = Some(id);
                self.state = InteractionState::ContextMenu { id };
                true
            }
            None => {
                self.state = InteractionState::Idle;
                false
            }
        }
    }

    /// Context-menu copy: duplicate in place with a new id and deep-copied
    /// anchors, then close the menu.
    pub fn context_copy(&mut self) -> Option<AnnotationId> {
        let InteractionState::ContextMenu { id } = self.state else {
            return None;
        };
        self.state = InteractionState::Idle;
        self.store.duplicate(id)
    }

    /// Context-menu delete.
    pub fn context_delete(&mut self) -> bool {
        let InteractionState::ContextMenu { id } = self.state else {
            return false;
        };
        self.state = InteractionState::Idle;
        self.delete_annotation(id)
    }

    /// Delete/Backspace: remove the selection if there is one.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        self.delete_annotation(id)
    }

    /// Remove an annotation by id. Unknown ids are a no-op. An active drag
    /// or open menu on the same annotation ends with it.
    pub fn delete_annotation(&mut self, id: AnnotationId) -> bool {
        if self.selected == Some(id) {
            self.selected = None;
        }
        match self.state {
            InteractionState::Dragging { id: target, .. } if target == id => {
                self.state = InteractionState::Idle;
            }
            InteractionState::ContextMenu { id: target } if target == id => {
                self.state = InteractionState::Idle;
            }
            _ => {}
        }
        let removed = self.store.remove(id);
        if removed {
            log::debug!("annotation deleted");
        }
        removed
    }

    /// Escape: discard any draft, close the menu, drop selection, disarm.
    pub fn cancel(&mut self) {
        self.tool = None;
        self.state = InteractionState::Idle;
        self.selected = None;
    }

    // ---- internals -------------------------------------------------------

    fn press_collecting(&mut self, mut draft: Annotation, point: DataPoint) {
        let kind = draft.kind;
        match kind.arity() {
            // Single-anchor kinds finalize on the very first click.
            Arity::Fixed(1) => {
                draft.anchors.push(point);
                self.emit(draft);
            }
            _ if kind.is_position() => {
                if draft.anchors.is_empty() {
                    // Entry plus TP/SL seeds; the pair fans out on pointer move.
                    draft.anchors.extend([point, point, point]);
                    self.state = InteractionState::Collecting { draft };
                } else {
                    self.emit(draft);
                }
            }
            Arity::Unbounded => {
                draft.anchors.push(point);
                self.state = InteractionState::Collecting { draft };
            }
            Arity::Fixed(required) => {
                if draft.anchors.is_empty() {
                    // First committed anchor plus the floating one.
                    draft.anchors.push(point);
                    draft.anchors.push(point);
                    self.state = InteractionState::Collecting { draft };
                } else {
                    let last = draft.anchors.len() - 1;
                    draft.anchors[last] = point;
                    if draft.anchors.len() == required {
                        self.emit(draft);
                    } else {
                        draft.anchors.push(point);
                        self.state = InteractionState::Collecting { draft };
                    }
                }
            }
        }
    }

    fn press_idle(&mut self, pos: ScreenPos, mapper: &dyn CoordinateMapper) -> bool {
        // Anchors of the current selection take precedence over body hits.
        if let Some(id) = self.selected {
            if let Some(annotation) = self.store.get(id) {
                if let Some(anchor) = anchor_hit(annotation, pos, mapper) {
                    self.state = InteractionState::Dragging {
                        id,
                        mode: DragMode::Resize { anchor },
                    };
                    return true;
                }
            }
        }

        if let Some(id) = topmost_hit(&self.store, pos, mapper) {
            self.selected = Some(id);
            self.state = InteractionState::Dragging {
                id,
                mode: DragMode::Move { last: pos },
            };
            return true;
        }

        self.selected = None;
        false
    }

    fn move_collecting(
        &self,
        draft: &mut Annotation,
        pos: ScreenPos,
        mapper: &dyn CoordinateMapper,
        bars: &[Bar],
    ) -> bool {
        if draft.anchors.is_empty() {
            return false;
        }

        if draft.kind == AnnotationKind::Brush {
            let Some(last) = draft.anchors.last().copied() else {
                return false;
            };
            let Some(last_px) = mapper.point_to_screen(last) else {
                return false;
            };
            if pos.distance_to(last_px) <= BRUSH_MIN_DISTANCE {
                return false;
            }
            let Some(point) = self.resolve_magnet(pos, mapper, bars) else {
                return false;
            };
            draft.anchors.push(point);
            return true;
        }

        let Some(point) = self.resolve_magnet(pos, mapper, bars) else {
            return false;
        };

        if draft.kind.is_position() {
            update_position_draft(draft, point);
            return true;
        }

        if let Some(last) = draft.anchors.last_mut() {
            *last = point;
            true
        } else {
            false
        }
    }

    fn move_dragging(
        &mut self,
        id: AnnotationId,
        mode: DragMode,
        pos: ScreenPos,
        mapper: &dyn CoordinateMapper,
        bars: &[Bar],
    ) -> bool {
        match mode {
            DragMode::Move { last } => {
                // The delta comes from inverse-mapping the pointer itself,
                // never the anchors, so off-screen anchors still move.
                let (Some(prev), Some(cur)) =
                    (mapper.screen_to_point(last), mapper.screen_to_point(pos))
                else {
                    self.state = InteractionState::Dragging { id, mode };
                    return false;
                };
                let Some(annotation) = self.store.get_mut(id) else {
                    // Deleted out from under the drag: end the gesture.
                    self.state = InteractionState::Idle;
                    return false;
                };
                annotation.translate(cur.time - prev.time, cur.price - prev.price);
                self.state = InteractionState::Dragging {
                    id,
                    mode: DragMode::Move { last: pos },
                };
                true
            }
            DragMode::Resize { anchor } => {
                let Some(point) = self.resolve_magnet(pos, mapper, bars) else {
                    self.state = InteractionState::Dragging { id, mode };
                    return false;
                };
                let Some(annotation) = self.store.get_mut(id) else {
                    self.state = InteractionState::Idle;
                    return false;
                };
                let moved = match annotation.anchor_mut(anchor) {
                    Some(a) => {
                        *a = point;
                        true
                    }
                    None => false,
                };
                self.state = InteractionState::Dragging { id, mode };
                moved
            }
        }
    }

    /// Inverse-map a pointer position, snapping when the magnet is on.
    /// Only collection and resize steps resolve through here; move-drag
    /// deltas are deliberately unsnapped.
    fn resolve_magnet(
        &self,
        pos: ScreenPos,
        mapper: &dyn CoordinateMapper,
        bars: &[Bar],
    ) -> Option<DataPoint> {
        let point = mapper.screen_to_point(pos)?;
        Some(if self.magnet {
            snap_to_ohlc(point, bars)
        } else {
            point
        })
    }

    fn emit(&mut self, draft: Annotation) {
        log::debug!(
            "placed {} with {} anchors",
            draft.kind.name(),
            draft.anchors.len()
        );
        self.store.add(draft);
        // Single-shot: the tool does not stay armed for a second shape.
        self.tool = None;
        self.state = InteractionState::Idle;
    }
}

/// Fan the TP/SL anchors out around the entry: whichever side of the entry
/// the cursor favors becomes the take-profit, and the stop-loss mirrors it
/// at the same price distance on the opposite side.
fn update_position_draft(draft: &mut Annotation, point: DataPoint) {
    if draft.anchors.len() < 3 {
        return;
    }
    let entry = draft.anchors[0];
    let dy = point.price - entry.price;
    let long = draft.kind == AnnotationKind::LongPosition;
    let favorable = if long {
        point.price > entry.price
    } else {
        point.price < entry.price
    };
    let (tp_price, sl_price) = if favorable {
        (point.price, entry.price - dy)
    } else {
        (entry.price - dy, point.price)
    };
    draft.anchors[1] = DataPoint::new(point.time, tp_price);
    draft.anchors[2] = DataPoint::new(point.time, sl_price);
}
