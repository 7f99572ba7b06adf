//! Gesture dispatch over the active tool
//!
//! The `Editor` ties the viewport controller, drag engine, marquee and
//! terrain compositor together behind the pointer/wheel/keyboard entry
//! points the embedding surface forwards. All handling is synchronous on the
//! caller's thread; the only deferred work is wheel coalescing (applied on
//! `on_frame`) and terrain loads driven through the compositor's generation
//! tokens.

use glam::Vec2;

use canvas_core::{ObjectId, ObjectStore, ObjectStyle, Rect, ToolMode, WorldObject};

use crate::drag::{group_bounds, DragEngine};
use crate::marquee::Marquee;
use crate::preferences::EditorPreferences;
use crate::terrain::{ImageLoader, TerrainCompositor};
use crate::transform::{screen_to_world, Viewport};
use crate::viewport::{ViewportController, WheelCoalescer};

/// Modifier keys active during a pointer event
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Any modifier turns clicks/marquees into selection-extending gestures
    pub fn multi(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// Editor core: owns viewport, selection gestures and the terrain raster
///
/// The object store is injected and mutated only through its trait; the
/// presentation layer reads `viewport()`, `raster()`, the store and
/// `visual_position()` each frame.
pub struct Editor<S: ObjectStore> {
    store: S,
    tool: ToolMode,
    viewport: ViewportController,
    drag: DragEngine,
    marquee: Option<Marquee>,
    terrain: TerrainCompositor,
    wheel: WheelCoalescer,
    style: ObjectStyle,
    object_size: Vec2,
    active_tileset: String,
    /// Last pointer position while the pan tool is held down
    pan_from: Option<Vec2>,
}

impl<S: ObjectStore> Editor<S> {
    pub fn new(store: S, view_size: Vec2, prefs: EditorPreferences) -> Self {
        Self {
            store,
            tool: ToolMode::default(),
            viewport: ViewportController::new(view_size, prefs.limits),
            drag: DragEngine::new(),
            marquee: None,
            terrain: TerrainCompositor::new(prefs.terrain),
            wheel: WheelCoalescer::new(),
            style: prefs.object_style,
            object_size: prefs.object_size,
            active_tileset: prefs.active_tileset,
            pan_from: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    /// Switch tools, aborting any gesture the old tool had in flight
    pub fn set_tool(&mut self, tool: ToolMode) {
        if tool != self.tool {
            self.drag.cancel();
            self.marquee = None;
            self.pan_from = None;
            log::debug!("tool -> {}", tool.display_name());
        }
        self.tool = tool;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    pub fn viewport_controller(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn terrain(&self) -> &TerrainCompositor {
        &self.terrain
    }

    pub fn active_tileset(&self) -> &str {
        &self.active_tileset
    }

    pub fn marquee_rect(&self) -> Option<Rect> {
        self.marquee.as_ref().map(|m| m.rect())
    }

    /// Where to draw an object this frame (drag/settle aware)
    pub fn visual_position(&self, obj: &WorldObject) -> Vec2 {
        self.drag.visual_position(obj)
    }

    /// Synthetic group handle bounds when more than one object is selected
    pub fn group_handle(&self) -> Option<Rect> {
        if self.store.selection().len() > 1 {
            group_bounds(&self.store)
        } else {
            None
        }
    }

    /// Switch the active tileset and regenerate the raster
    pub fn set_tileset(&mut self, name: &str, loader: &dyn ImageLoader) {
        self.active_tileset = name.to_string();
        self.regenerate_terrain(loader);
    }

    /// Regenerate the raster for the current tileset and view size
    pub fn regenerate_terrain(&mut self, loader: &dyn ImageLoader) {
        let view = self.viewport.view_size();
        let tileset = self.active_tileset.clone();
        let ok = self.terrain.generate(
            loader,
            &tileset,
            view.x.ceil() as u32,
            view.y.ceil() as u32,
            fastrand::u32(..),
        );
        if ok {
            let size = self.terrain.raster().map(|r| r.size());
            self.viewport.set_raster_size(size);
        }
    }

    /// Viewport resize: re-fit the camera without touching the raster
    pub fn on_resize(&mut self, view_size: Vec2) {
        self.viewport.set_view_size(view_size);
    }

    /// Queue a wheel tick; applied by the next `on_frame`
    pub fn on_wheel(&mut self, pointer: Vec2, delta: f32) {
        self.wheel.push(pointer, delta);
    }

    /// Per display frame: apply the pending wheel tick and release settled
    /// drag positions
    pub fn on_frame(&mut self) {
        if let Some(pending) = self.wheel.take() {
            self.viewport.zoom_at(pending.pointer, pending.delta);
        }
        self.drag.release_settled(&self.store);
    }

    pub fn on_pointer_down(&mut self, screen: Vec2, modifiers: Modifiers) {
        let world = screen_to_world(screen, &self.viewport.viewport());
        match self.tool {
            ToolMode::Draw => {
                let half = self.object_size / 2.0;
                let obj = WorldObject::with_style(
                    world.x - half.x,
                    world.y - half.y,
                    self.object_size.x,
                    self.object_size.y,
                    &self.style,
                );
                log::debug!("draw object {} at ({:.1}, {:.1})", obj.id, obj.x, obj.y);
                self.store.add_object(obj);
            }
            ToolMode::Select => self.select_pointer_down(world, modifiers),
            ToolMode::Pan => {
                self.pan_from = Some(screen);
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen: Vec2, _modifiers: Modifiers) {
        let world = screen_to_world(screen, &self.viewport.viewport());
        match self.tool {
            ToolMode::Draw => {}
            ToolMode::Select => {
                if self.drag.is_dragging() {
                    self.drag
                        .drag_to(world, self.viewport.raster_size());
                } else if let Some(marquee) = self.marquee.as_mut() {
                    marquee.update(world);
                }
            }
            ToolMode::Pan => {
                if let Some(from) = self.pan_from {
                    self.viewport.pan_by(screen - from);
                    self.pan_from = Some(screen);
                }
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen: Vec2, modifiers: Modifiers) {
        let world = screen_to_world(screen, &self.viewport.viewport());
        match self.tool {
            ToolMode::Draw => {}
            ToolMode::Select => {
                if self.drag.is_dragging() {
                    self.drag.drag_to(world, self.viewport.raster_size());
                    self.drag.end_drag(&mut self.store);
                } else if let Some(marquee) = self.marquee.take() {
                    marquee.finish(&mut self.store, modifiers.multi());
                }
            }
            ToolMode::Pan => {
                self.pan_from = None;
            }
        }
    }

    /// Pointer left the interactive surface: drags terminate (committing),
    /// marquee and pan are dropped
    pub fn on_pointer_leave(&mut self) {
        if self.drag.is_dragging() {
            self.drag.end_drag(&mut self.store);
        }
        self.marquee = None;
        self.pan_from = None;
    }

    /// Escape: abort gestures and clear the selection
    pub fn on_escape(&mut self) {
        self.drag.cancel();
        self.marquee = None;
        self.store.selection_mut().clear();
    }

    /// Delete: remove every selected object
    pub fn on_delete(&mut self) {
        let ids: Vec<ObjectId> = self.store.selection().ids().to_vec();
        if ids.is_empty() {
            return;
        }
        self.drag.cancel();
        self.store.delete_objects(&ids);
        self.store.selection_mut().clear();
        log::debug!("deleted {} object(s)", ids.len());
    }

    fn select_pointer_down(&mut self, world: Vec2, modifiers: Modifiers) {
        if let Some(hit) = hit_object(&self.store, world) {
            if modifiers.multi() {
                self.store.selection_mut().toggle(hit.clone());
                if !self.store.selection().contains(&hit) {
                    return; // toggled off, nothing to drag
                }
            } else if !self.store.selection().contains(&hit) {
                self.store.selection_mut().replace(hit.clone());
            }
            self.drag.begin_drag(&hit, world, &self.store);
            return;
        }

        // empty canvas: the synthetic group handle still accepts drags
        if let Some(bounds) = self.group_handle() {
            if bounds.contains_point(world) {
                self.drag.begin_group_drag(world, &self.store);
                return;
            }
        }

        self.marquee = Some(Marquee::begin(world));
    }
}

/// Topmost visible object under a world-space point (later objects are
/// drawn on top)
fn hit_object(store: &dyn ObjectStore, world: Vec2) -> Option<ObjectId> {
    store
        .list_objects()
        .iter()
        .rev()
        .find(|o| o.visible && o.bounds().contains_point(world))
        .map(|o| o.id.clone())
}
