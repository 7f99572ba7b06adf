//! Terrain raster generation
//!
//! The background of the world canvas is a single large bitmap composited
//! from a set of square tile images. Every tile-aligned cell samples a 2D
//! Perlin field; the normalized value (plus a little uniform jitter so equal
//! noise bands do not produce hard tile borders) picks which tile to stamp,
//! and each stamp is drawn with a near-opaque random alpha to soften seams.
//!
//! The finished raster is immutable: changing the active tileset regenerates
//! the whole bitmap. Tile loading may complete out of order, so every
//! request carries a generation token and stale results are discarded at
//! commit time instead of overwriting a newer raster.

use std::path::{Path, PathBuf};

use glam::Vec2;
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Base edge length of a tile in world pixels
pub const TILE_SIZE: u32 = 256;
/// The raster covers at least this multiple of the view size
pub const WORLD_SCALE: u32 = 6;

const NOISE_FREQUENCY: f64 = 0.007;
const JITTER: f32 = 0.05;
/// Flat fill used when a cell has no tile image at all
const FALLBACK_COLOR: Rgba<u8> = Rgba([0x6f, 0x8a, 0x4f, 0xff]);

/// A named tileset: `{base}/{name}/{prefix}_{i}.png` for `i` in `1..=count`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilesetConfig {
    pub name: String,
    pub prefix: String,
    pub tile_count: u32,
}

impl TilesetConfig {
    pub fn new(name: &str, prefix: &str, tile_count: u32) -> Self {
        Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
            tile_count,
        }
    }
}

/// Fixed terrain configuration (tile paths are not discovered at runtime)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainConfig {
    pub base_path: PathBuf,
    pub tile_size: u32,
    pub world_scale: u32,
    pub tilesets: Vec<TilesetConfig>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("assets/tiles"),
            tile_size: TILE_SIZE,
            world_scale: WORLD_SCALE,
            tilesets: vec![
                TilesetConfig::new("grass", "grass", 15),
                TilesetConfig::new("dirt", "dirt_stylized_rock", 15),
                TilesetConfig::new("water", "water", 15),
            ],
        }
    }
}

impl TerrainConfig {
    pub fn tileset(&self, name: &str) -> Option<&TilesetConfig> {
        self.tilesets.iter().find(|t| t.name == name)
    }

    /// Path of one tile image (1-based index per the asset convention)
    pub fn tile_path(&self, tileset: &TilesetConfig, index: u32) -> PathBuf {
        self.base_path
            .join(&tileset.name)
            .join(format!("{}_{}.png", tileset.prefix, index))
    }
}

/// Image loading collaborator; failure is a `None`, never an error
pub trait ImageLoader {
    fn load_image(&self, path: &Path) -> Option<DynamicImage>;
}

/// Filesystem-backed loader
#[derive(Debug, Default)]
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn load_image(&self, path: &Path) -> Option<DynamicImage> {
        match image::open(path) {
            Ok(img) => Some(img),
            Err(e) => {
                log::warn!("could not load tile image {:?}: {}", path, e);
                None
            }
        }
    }
}

/// The composited background bitmap; replaced wholesale, never patched
#[derive(Debug, Clone)]
pub struct TerrainRaster {
    image: RgbaImage,
}

impl TerrainRaster {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Generation token handed out when a regeneration starts
///
/// Commit checks it against the current generation; a token from a
/// superseded request is rejected so a slow late-arriving load cannot
/// overwrite a newer tileset's raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterRequest {
    generation: u64,
}

/// Produces and owns the background raster
#[derive(Debug)]
pub struct TerrainCompositor {
    config: TerrainConfig,
    generation: u64,
    raster: Option<TerrainRaster>,
}

impl TerrainCompositor {
    pub fn new(config: TerrainConfig) -> Self {
        Self {
            config,
            generation: 0,
            raster: None,
        }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn raster(&self) -> Option<&TerrainRaster> {
        self.raster.as_ref()
    }

    /// Start a new regeneration, invalidating all outstanding requests
    pub fn begin_request(&mut self) -> RasterRequest {
        self.generation += 1;
        RasterRequest {
            generation: self.generation,
        }
    }

    /// Install a finished raster if its request is still current
    pub fn commit(&mut self, request: RasterRequest, raster: TerrainRaster) -> bool {
        if request.generation != self.generation {
            log::debug!(
                "discarding stale terrain raster (generation {} < {})",
                request.generation,
                self.generation
            );
            return false;
        }
        self.raster = Some(raster);
        true
    }

    /// Load the tile images for a tileset; failed tiles stay `None`
    pub fn load_tiles(
        &self,
        loader: &dyn ImageLoader,
        tileset_name: &str,
    ) -> Option<Vec<Option<RgbaImage>>> {
        let tileset = self.config.tileset(tileset_name)?;
        let size = self.config.tile_size;
        let tiles = (1..=tileset.tile_count)
            .map(|i| {
                let path = self.config.tile_path(tileset, i);
                loader.load_image(&path).map(|img| {
                    let rgba = img.to_rgba8();
                    if rgba.dimensions() == (size, size) {
                        rgba
                    } else {
                        imageops::resize(&rgba, size, size, imageops::FilterType::Triangle)
                    }
                })
            })
            .collect();
        Some(tiles)
    }

    /// Composite one raster from the given tiles
    ///
    /// The raster covers `world_scale` times the view in each dimension,
    /// rounded up to a whole number of tiles. Cells whose selected tile
    /// failed to load use the first loaded tile; with no tiles at all the
    /// cell keeps the flat fallback fill.
    pub fn compose(
        &self,
        tiles: &[Option<RgbaImage>],
        view_width: u32,
        view_height: u32,
        seed: u32,
    ) -> TerrainRaster {
        let tile = self.config.tile_size;
        let map_w = (view_width * self.config.world_scale).div_ceil(tile) * tile;
        let map_h = (view_height * self.config.world_scale).div_ceil(tile) * tile;

        let mut canvas = RgbaImage::from_pixel(map_w, map_h, FALLBACK_COLOR);
        let perlin = Perlin::new(seed);
        let fallback = tiles.iter().flatten().next();

        for cell_x in (0..map_w).step_by(tile as usize) {
            for cell_y in (0..map_h).step_by(tile as usize) {
                let n = (perlin.get([
                    cell_x as f64 * NOISE_FREQUENCY,
                    cell_y as f64 * NOISE_FREQUENCY,
                ]) as f32
                    + 1.0)
                    / 2.0;
                let jitter = fastrand::f32() * (2.0 * JITTER) - JITTER;
                let idx = tile_index_for(n + jitter, tiles.len());

                let stamp = tiles.get(idx).and_then(|t| t.as_ref()).or(fallback);
                let Some(stamp) = stamp else {
                    continue;
                };
                let alpha = 0.95 + fastrand::f32() * 0.05;
                blend_tile(&mut canvas, stamp, cell_x, cell_y, alpha);
            }
        }

        TerrainRaster { image: canvas }
    }

    /// Synchronous load + compose + commit for one tileset
    ///
    /// Embedders with an async loader drive `begin_request` / `load_tiles` /
    /// `compose` / `commit` themselves.
    pub fn generate(
        &mut self,
        loader: &dyn ImageLoader,
        tileset_name: &str,
        view_width: u32,
        view_height: u32,
        seed: u32,
    ) -> bool {
        let request = self.begin_request();
        let Some(tiles) = self.load_tiles(loader, tileset_name) else {
            log::warn!("unknown tileset {:?}", tileset_name);
            return false;
        };
        let raster = self.compose(&tiles, view_width, view_height, seed);
        self.commit(request, raster)
    }
}

/// Map a normalized (possibly jittered) noise value to a tile index
fn tile_index_for(value: f32, tile_count: usize) -> usize {
    if tile_count == 0 {
        return 0;
    }
    let idx = (value * tile_count as f32).floor() as i64;
    idx.clamp(0, tile_count as i64 - 1) as usize
}

/// Stamp `tile` onto `canvas` at the cell origin with a global alpha
/// (plain src-over)
fn blend_tile(canvas: &mut RgbaImage, tile: &RgbaImage, x: u32, y: u32, alpha: f32) {
    let w = tile.width().min(canvas.width().saturating_sub(x));
    let h = tile.height().min(canvas.height().saturating_sub(y));
    for ty in 0..h {
        for tx in 0..w {
            let src = tile.get_pixel(tx, ty);
            let dst = canvas.get_pixel_mut(x + tx, y + ty);
            let sa = (src[3] as f32 / 255.0) * alpha;
            for c in 0..3 {
                let s = src[c] as f32;
                let d = dst[c] as f32;
                dst[c] = (s * sa + d * (1.0 - sa)).round() as u8;
            }
            let da = dst[3] as f32 / 255.0;
            dst[3] = ((sa + da * (1.0 - sa)) * 255.0).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_tile(size: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba([value, value, value, 255]))
    }

    fn small_config() -> TerrainConfig {
        TerrainConfig {
            tile_size: 4,
            world_scale: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_raster_size_rounds_up_to_whole_tiles() {
        let compositor = TerrainCompositor::new(small_config());
        let raster = compositor.compose(&[Some(flat_tile(4, 100))], 5, 3, 7);
        // 5*2=10 -> 12, 3*2=6 -> 8
        assert_eq!((raster.width(), raster.height()), (12, 8));
    }

    #[test]
    fn test_missing_tile_falls_back_to_first_loaded() {
        let compositor = TerrainCompositor::new(small_config());
        // five slots, index 2 failed to load
        let tiles = vec![
            Some(flat_tile(4, 10)),
            Some(flat_tile(4, 60)),
            None,
            Some(flat_tile(4, 160)),
            Some(flat_tile(4, 210)),
        ];
        let raster = compositor.compose(&tiles, 8, 8, 42);

        // every pixel must blend from a loaded tile; none may keep the
        // flat fallback fill (which would mean a hole where index 2 hit)
        for px in raster.image().pixels() {
            assert_ne!(px, &FALLBACK_COLOR, "cell left unfilled");
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn test_no_tiles_at_all_uses_flat_fill() {
        let compositor = TerrainCompositor::new(small_config());
        let raster = compositor.compose(&[None, None], 4, 4, 1);
        for px in raster.image().pixels() {
            assert_eq!(px, &FALLBACK_COLOR);
        }
    }

    #[test]
    fn test_tile_index_mapping() {
        assert_eq!(tile_index_for(-0.2, 5), 0);
        assert_eq!(tile_index_for(0.0, 5), 0);
        assert_eq!(tile_index_for(0.5, 5), 2);
        assert_eq!(tile_index_for(0.999, 5), 4);
        assert_eq!(tile_index_for(1.3, 5), 4);
        assert_eq!(tile_index_for(0.5, 0), 0);
    }

    #[test]
    fn test_stale_request_is_discarded() {
        let mut compositor = TerrainCompositor::new(small_config());
        let raster = compositor.compose(&[Some(flat_tile(4, 50))], 4, 4, 1);

        let stale = compositor.begin_request();
        let current = compositor.begin_request();

        assert!(!compositor.commit(stale, raster.clone()));
        assert!(compositor.raster().is_none());
        assert!(compositor.commit(current, raster));
        assert!(compositor.raster().is_some());
    }

    #[test]
    fn test_tile_path_convention() {
        let config = TerrainConfig::default();
        let dirt = config.tileset("dirt").unwrap();
        assert_eq!(
            config.tile_path(dirt, 3),
            PathBuf::from("assets/tiles/dirt/dirt_stylized_rock_3.png")
        );
    }

    #[test]
    fn test_unknown_tileset() {
        let compositor = TerrainCompositor::new(TerrainConfig::default());
        assert!(compositor
            .load_tiles(&FsImageLoader, "lava")
            .is_none());
    }
}
