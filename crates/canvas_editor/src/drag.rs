//! Object drag engine
//!
//! Dragging moves every selected object in lockstep. At drag start the
//! engine captures one offset per selected object (object position minus the
//! drag anchor's position) into a map it owns; during the gesture only the
//! anchor moves and each object's visual position is `anchor + offset`.
//! Nothing is written to the object store until the drag ends, which keeps
//! store-driven re-renders from fighting the in-progress gesture.
//!
//! After the commit, objects keep reporting their last local position until
//! the store value converges within a small epsilon. Without this settle
//! window a store that updates asynchronously would show a one-frame snap
//! back to the stale position.

use std::collections::HashMap;

use glam::Vec2;

use canvas_core::{ObjectId, ObjectStore, Rect, WorldObject};

/// Store/local convergence tolerance for the post-commit settle check
const SETTLE_EPS: f32 = 0.01;

#[derive(Debug, Clone, Copy)]
struct DragItem {
    /// Object position minus anchor position, captured at drag start
    offset: Vec2,
    /// Object extent, for the drag-bound constraint
    size: Vec2,
}

#[derive(Debug)]
struct ActiveDrag {
    /// Current anchor position in world space
    anchor: Vec2,
    /// Pointer world position minus anchor position at grab time
    grab_offset: Vec2,
    items: HashMap<ObjectId, DragItem>,
}

/// Synchronized single/multi-object drag with per-object offset bookkeeping
#[derive(Debug, Default)]
pub struct DragEngine {
    active: Option<ActiveDrag>,
    /// Positions committed at drag end, held until the store catches up
    settling: HashMap<ObjectId, Vec2>,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Begin dragging with the given object as the anchor
    ///
    /// Every currently selected object enters the drag simultaneously.
    /// Returns false if the anchor does not resolve to a live object.
    pub fn begin_drag(
        &mut self,
        anchor_id: &str,
        pointer_world: Vec2,
        store: &dyn ObjectStore,
    ) -> bool {
        let Some(anchor_obj) = store.get_object(anchor_id) else {
            return false;
        };
        self.begin_at(anchor_obj.position(), pointer_world, store);
        true
    }

    /// Begin a group drag anchored at the synthetic selection bounding box
    ///
    /// Returns false unless more than one object is selected.
    pub fn begin_group_drag(&mut self, pointer_world: Vec2, store: &dyn ObjectStore) -> bool {
        if store.selection().len() <= 1 {
            return false;
        }
        let Some(bounds) = group_bounds(store) else {
            return false;
        };
        self.begin_at(bounds.top_left(), pointer_world, store);
        true
    }

    fn begin_at(&mut self, anchor: Vec2, pointer_world: Vec2, store: &dyn ObjectStore) {
        let mut items = HashMap::new();
        for id in store.selection().ids() {
            if let Some(obj) = store.get_object(id) {
                items.insert(
                    id.clone(),
                    DragItem {
                        offset: obj.position() - anchor,
                        size: Vec2::new(obj.width, obj.height),
                    },
                );
            }
        }
        log::debug!("drag start: {} object(s)", items.len());
        self.active = Some(ActiveDrag {
            anchor,
            grab_offset: pointer_world - anchor,
            items,
        });
    }

    /// Advance the drag to the current pointer position
    ///
    /// When a raster exists the anchor is clipped so that no selected
    /// object's bounding box can leave `[0, raster.x] x [0, raster.y]`.
    pub fn drag_to(&mut self, pointer_world: Vec2, raster_size: Option<Vec2>) {
        let Some(drag) = self.active.as_mut() else {
            return;
        };
        let mut anchor = pointer_world - drag.grab_offset;
        if let Some(raster) = raster_size {
            anchor = bound_anchor(anchor, raster, drag.items.values());
        }
        drag.anchor = anchor;
    }

    /// Commit each dragged object's final position to the store exactly once
    /// and enter the settle window
    pub fn end_drag(&mut self, store: &mut dyn ObjectStore) {
        let Some(drag) = self.active.take() else {
            return;
        };
        for (id, item) in &drag.items {
            let pos = drag.anchor + item.offset;
            store.move_object(id, pos.x, pos.y);
            self.settling.insert(id.clone(), pos);
        }
        log::debug!("drag end: committed {} object(s)", drag.items.len());
    }

    /// Abort the gesture without committing anything
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// The position the presentation layer should draw an object at
    ///
    /// During a drag this is `anchor + offset`; during the settle window it
    /// is the committed local position; otherwise the store position.
    pub fn visual_position(&self, obj: &WorldObject) -> Vec2 {
        if let Some(drag) = &self.active {
            if let Some(item) = drag.items.get(&obj.id) {
                return drag.anchor + item.offset;
            }
        }
        if let Some(local) = self.settling.get(&obj.id) {
            return *local;
        }
        obj.position()
    }

    /// Release settle entries whose store position has converged
    ///
    /// Called once per frame; objects whose store value is within tolerance
    /// of the committed position hand control back to the store.
    pub fn release_settled(&mut self, store: &dyn ObjectStore) {
        self.settling.retain(|id, local| match store.get_object(id) {
            Some(obj) => (obj.position() - *local).abs().max_element() >= SETTLE_EPS,
            None => false,
        });
    }
}

/// Clip the anchor so every drag item's box stays inside the raster
fn bound_anchor<'a>(
    anchor: Vec2,
    raster: Vec2,
    items: impl Iterator<Item = &'a DragItem>,
) -> Vec2 {
    let mut lo = Vec2::splat(f32::NEG_INFINITY);
    let mut hi = Vec2::splat(f32::INFINITY);
    for item in items {
        lo = lo.max(-item.offset);
        hi = hi.min(raster - item.size - item.offset);
    }
    // an object larger than the raster pins to the origin edge
    hi = hi.max(lo);
    anchor.clamp(lo, hi)
}

/// Union of the selected objects' bounding boxes (the synthetic group
/// drag handle shown for multi-selections)
pub fn group_bounds(store: &dyn ObjectStore) -> Option<Rect> {
    let mut bounds: Option<Rect> = None;
    for id in store.selection().ids() {
        if let Some(obj) = store.get_object(id) {
            let b = obj.bounds();
            bounds = Some(match bounds {
                Some(acc) => acc.union(&b),
                None => b,
            });
        }
    }
    bounds
}
