//! Viewport, selection and terrain engine for the canvas scene editor
//!
//! This crate holds the interactive core behind the editing surface:
//! - `transform` - pure screen/world coordinate mapping
//! - `viewport` - pointer-anchored zoom, pan clamping, fit-to-screen
//! - `drag` - single and synchronized multi-object dragging
//! - `marquee` - rubber-band selection
//! - `terrain` - noise-driven tile compositing into the background raster
//! - `editor` - gesture dispatch over the active tool
//! - `preferences` - persisted editor configuration
//!
//! The core never renders. A presentation layer reads the viewport, the
//! terrain raster, the object store and the per-frame visual positions, and
//! feeds pointer/wheel/keyboard events back in.

pub mod drag;
pub mod editor;
pub mod marquee;
pub mod preferences;
pub mod terrain;
pub mod transform;
pub mod viewport;

pub use drag::{group_bounds, DragEngine};
pub use editor::{Editor, Modifiers};
pub use marquee::Marquee;
pub use preferences::{EditorPreferences, PreferencesError};
pub use terrain::{
    FsImageLoader, ImageLoader, RasterRequest, TerrainCompositor, TerrainConfig, TerrainRaster,
    TilesetConfig, TILE_SIZE, WORLD_SCALE,
};
pub use transform::{screen_to_world, world_to_screen, Viewport};
pub use viewport::{PendingWheel, ViewportController, ViewportLimits, WheelCoalescer};
