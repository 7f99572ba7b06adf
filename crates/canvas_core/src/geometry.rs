//! Axis-aligned rectangle math shared by selection and viewport code

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from two opposite corners, normalizing so that
    /// width and height are non-negative regardless of drag direction
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Inclusive AABB overlap test (touching edges count as intersecting)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.right() >= other.x
            && self.x <= other.right()
            && self.bottom() >= other.y
            && self.y <= other.bottom()
    }

    /// Smallest rectangle enclosing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let r = Rect::from_corners(Vec2::new(40.0, 50.0), Vec2::new(10.0, 20.0));
        assert_eq!(r, Rect::new(10.0, 20.0, 30.0, 30.0));
    }

    #[test]
    fn test_intersects() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        assert!(a.intersects(&Rect::new(40.0, 40.0, 20.0, 20.0)));
        assert!(a.intersects(&Rect::new(50.0, 50.0, 10.0, 10.0))); // edge touch
        assert!(!a.intersects(&Rect::new(51.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 10.0, 30.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 30.0, 35.0));
    }
}
