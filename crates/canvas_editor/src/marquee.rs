//! Rubber-band (marquee) selection

use glam::Vec2;

use canvas_core::{ObjectId, ObjectStore, Rect};

/// An in-progress marquee gesture, tracked in world coordinates
///
/// The rectangle is always normalized, so dragging up/left works the same as
/// dragging down/right.
#[derive(Debug, Clone)]
pub struct Marquee {
    start: Vec2,
    current: Vec2,
}

impl Marquee {
    /// Start a marquee at the world-space pointer position
    pub fn begin(world: Vec2) -> Self {
        Self {
            start: world,
            current: world,
        }
    }

    /// Grow the box to the current pointer position
    pub fn update(&mut self, world: Vec2) {
        self.current = world;
    }

    /// The normalized selection box (non-negative extent)
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.start, self.current)
    }

    /// Ids of all objects whose bounding box overlaps the marquee box
    pub fn intersecting_ids(&self, store: &dyn ObjectStore) -> Vec<ObjectId> {
        let rect = self.rect();
        store
            .list_objects()
            .iter()
            .filter(|o| o.bounds().intersects(&rect))
            .map(|o| o.id.clone())
            .collect()
    }

    /// Resolve the gesture against the store's selection
    ///
    /// With a modifier held the hits are unioned into the existing
    /// selection; otherwise they replace it (an empty hit set clears it).
    pub fn finish(self, store: &mut dyn ObjectStore, additive: bool) {
        let hits = self.intersecting_ids(store);
        log::debug!("marquee finished: {} hit(s), additive={}", hits.len(), additive);
        if additive {
            store.selection_mut().merge(hits);
        } else {
            store.selection_mut().replace_all(hits);
        }
    }
}
