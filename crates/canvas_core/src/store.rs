//! Object store boundary
//!
//! The editor core mutates placed objects and the selection exclusively
//! through this trait; persistence and any store-driven re-rendering belong
//! to the embedder. Engines receive the store by explicit reference rather
//! than through a global lookup so they stay testable in isolation.

use crate::object::{ObjectId, WorldObject};
use crate::selection::SelectionSet;

/// Owner of the placed objects and the current selection
pub trait ObjectStore {
    fn list_objects(&self) -> &[WorldObject];

    fn get_object(&self, id: &str) -> Option<&WorldObject>;

    fn add_object(&mut self, obj: WorldObject);

    /// Commit a new world position for one object
    fn move_object(&mut self, id: &str, x: f32, y: f32);

    fn delete_objects(&mut self, ids: &[ObjectId]);

    fn selection(&self) -> &SelectionSet;

    fn selection_mut(&mut self) -> &mut SelectionSet;
}

/// Reference in-memory store used by tests and simple embeddings
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Vec<WorldObject>,
    selection: SelectionSet,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete every selected object and clear the selection
    pub fn delete_selected(&mut self) {
        let ids: Vec<ObjectId> = self.selection.ids().to_vec();
        self.delete_objects(&ids);
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn list_objects(&self) -> &[WorldObject] {
        &self.objects
    }

    fn get_object(&self, id: &str) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn add_object(&mut self, obj: WorldObject) {
        self.objects.push(obj);
    }

    fn move_object(&mut self, id: &str, x: f32, y: f32) {
        if let Some(obj) = self.objects.iter_mut().find(|o| o.id == id) {
            obj.x = x;
            obj.y = y;
        }
    }

    fn delete_objects(&mut self, ids: &[ObjectId]) {
        self.objects.retain(|o| !ids.contains(&o.id));
        self.selection.retain(|id| !ids.iter().any(|d| d == id));
    }

    fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }
}
