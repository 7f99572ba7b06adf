//! Viewport controller: pointer-anchored zoom, pan clamping, fit-to-screen
//!
//! The controller owns the current `Viewport` and the physical limits it is
//! allowed to move within. The zoom-out floor is dynamic: whenever a raster
//! is fitted to the screen, that fit scale becomes the new minimum, with a
//! small snap band below it so wheel gestures settle onto the floor instead
//! of oscillating around it.
//!
//! Until a terrain raster is available there is nothing to clamp against, so
//! every operation degrades to a no-op that leaves the viewport unchanged.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::transform::Viewport;

const SCALE_EPS: f32 = 1e-4;
/// Scales below `floor * SNAP_HIGH` snap onto the floor exactly, giving the
/// zoom-out gesture a narrow settle band instead of a hard edge
const SNAP_HIGH: f32 = 1.005;

/// Tunable physical limits for the viewport
///
/// The padding and snap constants come from the most recent revision of the
/// gesture code and are deliberately adjustable, not load-bearing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewportLimits {
    /// Static zoom-out floor used before any raster has been fitted
    pub min_scale: f32,
    pub max_scale: f32,
    /// How far (in screen pixels at scale 1) the raster may pan past the
    /// viewport edge; divided by the scale so it stays perceptually constant
    pub pan_padding: f32,
    /// Fraction of the exact fit scale used by fit-to-screen
    pub initial_fit: f32,
    /// Multiplicative scale step per discrete wheel tick
    pub zoom_step: f32,
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.3,
            max_scale: 5.0,
            pan_padding: 200.0,
            initial_fit: 0.7,
            zoom_step: 1.08,
        }
    }
}

/// A wheel event queued for the next frame
#[derive(Debug, Clone, Copy)]
pub struct PendingWheel {
    pub pointer: Vec2,
    pub delta: f32,
}

/// Coalesces rapid wheel events to at most one recompute per display frame
///
/// Only the most recent pending event survives; intermediate deltas are
/// discarded rather than accumulated, matching the source's rAF batching.
#[derive(Debug, Default)]
pub struct WheelCoalescer {
    pending: Option<PendingWheel>,
}

impl WheelCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pointer: Vec2, delta: f32) {
        self.pending = Some(PendingWheel { pointer, delta });
    }

    /// Drain the pending event, if any; called once per frame
    pub fn take(&mut self) -> Option<PendingWheel> {
        self.pending.take()
    }
}

/// Owns the viewport state and applies zoom/pan/fit within the limits
#[derive(Debug)]
pub struct ViewportController {
    viewport: Viewport,
    limits: ViewportLimits,
    view_size: Vec2,
    raster_size: Option<Vec2>,
    /// Fit-to-screen scale recorded at raster load; dynamic zoom-out floor
    fit_floor: Option<f32>,
}

impl ViewportController {
    pub fn new(view_size: Vec2, limits: ViewportLimits) -> Self {
        Self {
            viewport: Viewport::default(),
            limits,
            view_size,
            raster_size: None,
            fit_floor: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn limits(&self) -> &ViewportLimits {
        &self.limits
    }

    pub fn view_size(&self) -> Vec2 {
        self.view_size
    }

    pub fn raster_size(&self) -> Option<Vec2> {
        self.raster_size
    }

    /// Current zoom-out floor: the last fit scale, or the static default
    pub fn min_scale(&self) -> f32 {
        self.fit_floor.unwrap_or(self.limits.min_scale)
    }

    /// Install a new raster size and re-fit the view to it
    pub fn set_raster_size(&mut self, size: Option<Vec2>) {
        self.raster_size = size;
        if size.is_some() {
            self.fit_to_screen();
        }
    }

    /// React to a viewport resize; re-fits without touching the raster
    pub fn set_view_size(&mut self, size: Vec2) {
        self.view_size = size;
        if self.raster_size.is_some() {
            self.fit_to_screen();
        }
    }

    /// Clamp a candidate position for the given scale
    ///
    /// Per dimension: a raster smaller than the view is forced to center;
    /// otherwise the raster may overshoot the view edge by at most
    /// `pan_padding / scale`.
    pub fn clamp_position(&self, pos: Vec2, scale: f32) -> Vec2 {
        let Some(raster) = self.raster_size else {
            return pos;
        };

        let map = raster * scale;
        let view = self.view_size;
        let pad = self.limits.pan_padding / scale;

        let clamp_axis = |p: f32, map: f32, view: f32| -> f32 {
            if map <= view {
                (view - map) / 2.0
            } else {
                p.clamp(view - map - pad, pad)
            }
        };

        Vec2::new(
            clamp_axis(pos.x, map.x, view.x),
            clamp_axis(pos.y, map.y, view.y),
        )
    }

    /// Zoom by one wheel tick, keeping the world point under `pointer` fixed
    ///
    /// Positive `wheel_delta` (scroll down) zooms out. Returns the resulting
    /// viewport; a no-op while no raster is loaded.
    pub fn zoom_at(&mut self, pointer: Vec2, wheel_delta: f32) -> Viewport {
        if self.raster_size.is_none() || wheel_delta == 0.0 {
            return self.viewport;
        }

        let old_scale = self.viewport.scale;
        let step = self.limits.zoom_step;
        let mut new_scale = if wheel_delta > 0.0 {
            old_scale / step
        } else {
            old_scale * step
        };

        let floor = self.min_scale();
        // anything inside the snap band settles onto the floor exactly
        if new_scale < floor * SNAP_HIGH {
            new_scale = floor;
        }
        new_scale = new_scale.min(self.limits.max_scale);

        // Solve for the position that keeps the pointer's world point fixed
        let mouse_point_to = (pointer - self.viewport.position) / old_scale;
        let unclamped = pointer - mouse_point_to * new_scale;
        let clamped = self.clamp_position(unclamped, new_scale);

        let small_change = (new_scale - old_scale).abs() < SCALE_EPS
            && (clamped - self.viewport.position).abs().max_element() < 0.5;
        if small_change {
            return self.viewport;
        }

        self.viewport = Viewport::new(new_scale, clamped);
        log::debug!(
            "zoom {:.4} -> {:.4} at pointer ({:.1}, {:.1})",
            old_scale,
            new_scale,
            pointer.x,
            pointer.y
        );
        self.viewport
    }

    /// Pan the viewport by a screen-space delta, clamped
    pub fn pan_by(&mut self, delta: Vec2) -> Viewport {
        if self.raster_size.is_none() {
            return self.viewport;
        }
        let pos = self.clamp_position(self.viewport.position + delta, self.viewport.scale);
        self.viewport.position = pos;
        self.viewport
    }

    /// Set an absolute position (stage drag), clamped
    pub fn set_position(&mut self, pos: Vec2) -> Viewport {
        if self.raster_size.is_none() {
            return self.viewport;
        }
        self.viewport.position = self.clamp_position(pos, self.viewport.scale);
        self.viewport
    }

    /// Scale the raster to fit the view, center it, and record the fit scale
    /// as the new dynamic zoom-out floor
    pub fn fit_to_screen(&mut self) -> Viewport {
        let Some(raster) = self.raster_size else {
            return self.viewport;
        };

        let fit = (self.view_size.x / raster.x)
            .min(self.view_size.y / raster.y)
            * self.limits.initial_fit;
        self.fit_floor = Some(fit);

        let centered = (self.view_size - raster * fit) / 2.0;
        let clamped = self.clamp_position(centered, fit);
        self.viewport = Viewport::new(fit, clamped);
        log::debug!("fit to screen: scale {:.4}", fit);
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::screen_to_world;

    fn controller_1000_in_500(fit: f32) -> ViewportController {
        let limits = ViewportLimits {
            initial_fit: fit,
            ..Default::default()
        };
        let mut vc = ViewportController::new(Vec2::new(500.0, 500.0), limits);
        vc.set_raster_size(Some(Vec2::new(1000.0, 1000.0)));
        vc
    }

    #[test]
    fn test_noop_without_raster() {
        let mut vc = ViewportController::new(Vec2::new(800.0, 600.0), ViewportLimits::default());
        let before = vc.viewport();
        assert_eq!(vc.zoom_at(Vec2::new(400.0, 300.0), -1.0), before);
        assert_eq!(vc.fit_to_screen(), before);
        assert_eq!(
            vc.clamp_position(Vec2::new(-9999.0, 42.0), 1.0),
            Vec2::new(-9999.0, 42.0)
        );
    }

    #[test]
    fn test_fit_scale_and_floor() {
        let vc = controller_1000_in_500(0.5);
        assert!((vc.viewport().scale - 0.25).abs() < 1e-6);
        assert!((vc.min_scale() - 0.25).abs() < 1e-6);
        // scaled raster (250x250) is smaller than the view, so it centers
        assert_eq!(vc.viewport().position, Vec2::new(125.0, 125.0));
    }

    #[test]
    fn test_zoom_never_breaks_floor() {
        let mut vc = controller_1000_in_500(0.5);
        for _ in 0..50 {
            vc.zoom_at(Vec2::new(250.0, 250.0), 1.0);
        }
        assert!(vc.viewport().scale >= 0.25 * 0.998);
    }

    #[test]
    fn test_zoom_respects_max_scale() {
        let mut vc = controller_1000_in_500(0.7);
        for _ in 0..100 {
            vc.zoom_at(Vec2::new(250.0, 250.0), -1.0);
        }
        assert!(vc.viewport().scale <= vc.limits().max_scale + 1e-6);
    }

    #[test]
    fn test_zoom_preserves_pointer_world_point() {
        let limits = ViewportLimits::default();
        let mut vc = ViewportController::new(Vec2::new(800.0, 600.0), limits);
        vc.set_raster_size(Some(Vec2::new(4000.0, 4000.0)));
        // zoom in far enough that the raster overfills the view in both
        // dimensions, so centering/clamping stays inactive
        for _ in 0..12 {
            vc.zoom_at(Vec2::new(400.0, 300.0), -1.0);
        }

        let pointer = Vec2::new(412.0, 288.0);
        let before = screen_to_world(pointer, &vc.viewport());
        let after_vp = vc.zoom_at(pointer, -1.0);
        let after = screen_to_world(pointer, &after_vp);
        assert!(
            (before - after).length() < 1e-3,
            "anchor drifted: {before:?} -> {after:?}"
        );
    }

    #[test]
    fn test_clamp_idempotent() {
        let mut vc = controller_1000_in_500(0.7);
        // also exercise the oversized case
        for _ in 0..10 {
            vc.zoom_at(Vec2::new(250.0, 250.0), -1.0);
        }
        let scale = vc.viewport().scale;
        let candidates = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1e6, -1e6),
            Vec2::new(-1e6, 1e6),
            Vec2::new(37.0, -141.0),
        ];
        for pos in candidates {
            let once = vc.clamp_position(pos, scale);
            let twice = vc.clamp_position(once, scale);
            assert!((once - twice).length() < 1e-4, "not idempotent at {pos:?}");
        }
    }

    #[test]
    fn test_clamp_centers_small_raster() {
        let vc = controller_1000_in_500(0.5);
        let clamped = vc.clamp_position(Vec2::new(-400.0, 900.0), 0.25);
        assert_eq!(clamped, Vec2::new(125.0, 125.0));
    }

    #[test]
    fn test_clamp_bounds_large_raster() {
        let vc = controller_1000_in_500(0.7);
        // at scale 2 the raster is 2000px in a 500px view; pad = 100
        let pad = vc.limits().pan_padding / 2.0;
        let clamped = vc.clamp_position(Vec2::new(1e6, -1e6), 2.0);
        assert_eq!(clamped.x, pad);
        assert_eq!(clamped.y, 500.0 - 2000.0 - pad);
    }

    #[test]
    fn test_refit_on_resize() {
        let mut vc = controller_1000_in_500(0.5);
        vc.set_view_size(Vec2::new(1000.0, 1000.0));
        assert!((vc.viewport().scale - 0.5).abs() < 1e-6);
        assert!((vc.min_scale() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_coalescer_keeps_latest() {
        let mut wc = WheelCoalescer::new();
        assert!(wc.take().is_none());
        wc.push(Vec2::new(1.0, 1.0), -1.0);
        wc.push(Vec2::new(2.0, 2.0), 1.0);
        let pending = wc.take().unwrap();
        assert_eq!(pending.pointer, Vec2::new(2.0, 2.0));
        assert_eq!(pending.delta, 1.0);
        assert!(wc.take().is_none());
    }
}
