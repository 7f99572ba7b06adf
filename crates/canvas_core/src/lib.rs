//! Core data structures for the canvas scene editor
//!
//! This crate provides the fundamental types for representing an editable
//! 2D scene:
//! - `WorldObject` - A placed rectangular object with visual styling
//! - `SelectionSet` - The ordered set of selected object ids
//! - `Rect` - Axis-aligned rectangle used for bounds and marquee math
//! - `ToolMode` - The active interaction tool (draw / select / pan)
//! - `ObjectStore` - Boundary trait for the object/selection owner

mod geometry;
mod object;
mod selection;
mod store;
mod tool;

pub use geometry::Rect;
pub use object::{ObjectId, ObjectStyle, WorldObject};
pub use selection::SelectionSet;
pub use store::{InMemoryObjectStore, ObjectStore};
pub use tool::ToolMode;
