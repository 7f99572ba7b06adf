//! Placed scene objects

use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Rect;

/// Opaque, immutable object identifier assigned at creation
pub type ObjectId = String;

/// Visual styling applied to newly drawn objects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStyle {
    pub color: String,
    pub opacity: f32,
    pub shadow_blur: f32,
    pub shadow_color: String,
}

impl Default for ObjectStyle {
    fn default() -> Self {
        Self {
            color: "#3498db".to_string(),
            opacity: 1.0,
            shadow_blur: 10.0,
            shadow_color: "#000000".to_string(),
        }
    }
}

/// A rectangular object placed on the world canvas
///
/// `x`/`y` are the top-left corner in world coordinates. Objects are kept
/// inside the terrain raster by the drag-bound constraint while dragging,
/// but programmatic creation does not enforce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
    pub rotation: f32,
    pub opacity: f32,
    pub shadow_blur: f32,
    pub shadow_color: String,
    pub visible: bool,
    pub layer: i32,
}

impl WorldObject {
    /// Create a new object at the given world position with default styling
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::with_style(x, y, width, height, &ObjectStyle::default())
    }

    /// Create a new object with the supplied styling
    pub fn with_style(x: f32, y: f32, width: f32, height: f32, style: &ObjectStyle) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: None,
            x,
            y,
            width,
            height,
            color: style.color.clone(),
            rotation: 0.0,
            opacity: style.opacity,
            shadow_blur: style.shadow_blur,
            shadow_color: style.shadow_color.clone(),
            visible: true,
            layer: 0,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Axis-aligned bounding box in world coordinates
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
