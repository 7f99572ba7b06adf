//! Screen/world coordinate transforms
//!
//! The viewport maps world space (fixed coordinates of the raster and placed
//! objects) to screen space (pixels of the viewing surface) with a uniform
//! scale and a translation. Both directions are pure and exact inverses of
//! each other up to floating-point epsilon.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Current camera state: uniform zoom plus the raster's top-left screen
/// coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f32,
    pub position: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            position: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn new(scale: f32, position: Vec2) -> Self {
        Self { scale, position }
    }
}

/// Map a screen-space point to world space
///
/// A zero or negative scale is a programmer error, not a runtime failure.
pub fn screen_to_world(screen: Vec2, viewport: &Viewport) -> Vec2 {
    debug_assert!(viewport.scale > 0.0, "viewport scale must be positive");
    (screen - viewport.position) / viewport.scale
}

/// Map a world-space point to screen space
pub fn world_to_screen(world: Vec2, viewport: &Viewport) -> Vec2 {
    debug_assert!(viewport.scale > 0.0, "viewport scale must be positive");
    world * viewport.scale + viewport.position
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_is_identity() {
        let viewports = [
            Viewport::new(1.0, Vec2::ZERO),
            Viewport::new(0.25, Vec2::new(-310.5, 44.0)),
            Viewport::new(3.7, Vec2::new(1200.0, -9.25)),
        ];
        let points = [
            Vec2::ZERO,
            Vec2::new(17.0, -3.5),
            Vec2::new(-800.25, 601.125),
        ];
        for vp in &viewports {
            for p in points {
                let back = world_to_screen(screen_to_world(p, vp), vp);
                assert!((back - p).length() < 1e-3, "{back:?} != {p:?} at {vp:?}");
            }
        }
    }

    #[test]
    fn test_known_mapping() {
        let vp = Viewport::new(2.0, Vec2::new(100.0, 50.0));
        assert_eq!(
            screen_to_world(Vec2::new(100.0, 50.0), &vp),
            Vec2::ZERO
        );
        assert_eq!(
            world_to_screen(Vec2::new(10.0, 10.0), &vp),
            Vec2::new(120.0, 70.0)
        );
    }
}
