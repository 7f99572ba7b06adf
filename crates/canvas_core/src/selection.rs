//! Selection state for the select tool

use serde::{Deserialize, Serialize};

use crate::object::ObjectId;

/// The ordered set of selected object ids
///
/// `primary_id` is populated only when exactly one object is selected; it
/// drives single-object affordances such as a detail inspector. Multi
/// selections have no primary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: Vec<ObjectId>,
    primary_id: Option<ObjectId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn primary_id(&self) -> Option<&ObjectId> {
        self.primary_id.as_ref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Replace the selection with a single id (plain click)
    pub fn replace(&mut self, id: ObjectId) {
        self.ids = vec![id];
        self.update_primary();
    }

    /// Replace the selection with a set of ids (marquee release)
    pub fn replace_all(&mut self, ids: Vec<ObjectId>) {
        self.ids = ids;
        self.ids.dedup();
        self.update_primary();
    }

    /// Toggle membership of an id (modifier-click)
    pub fn toggle(&mut self, id: ObjectId) {
        if let Some(pos) = self.ids.iter().position(|s| *s == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
        self.update_primary();
    }

    /// Union a set of ids into the selection (modifier-marquee release)
    pub fn merge(&mut self, ids: Vec<ObjectId>) {
        for id in ids {
            if !self.contains(&id) {
                self.ids.push(id);
            }
        }
        self.update_primary();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.primary_id = None;
    }

    /// Drop ids that no longer resolve to live objects
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.ids.retain(|id| keep(id));
        self.update_primary();
    }

    fn update_primary(&mut self) {
        self.primary_id = if self.ids.len() == 1 {
            Some(self.ids[0].clone())
        } else {
            None
        };
    }
}
