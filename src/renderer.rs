//! Tile-based parallel rendering.
//!
//! Divides the image into a grid of tiles that are rendered independently on
//! a rayon worker pool. Every tile gets its own generator, seeded from the
//! render seed and the tile's grid index, so the image does not depend on how
//! the work was scheduled.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::cameras::Camera;
use crate::error::Result;
use crate::integrator::radiance;
use crate::objects::Hittable;
use crate::Color;

/// Knobs that change how the work is split, not what the image shows
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Worker threads in the pool
    pub threads: usize,
    /// Number of tiles along each image axis
    pub tiles_per_axis: u32,
    /// Base seed every tile generator is derived from
    pub seed: u64,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}
impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            threads: 16,
            tiles_per_axis: 16,
            seed: 0,
            show_progress: false,
        }
    }
}

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of the tile's top-left corner
    pub x: u32,
    /// Y coordinate of the tile's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Row-major position in the tile grid
    pub index: usize,
}
impl Tile {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Cut a `width` x `height` image into a `per_axis` x `per_axis` grid.
///
/// Tile sizes round up and edge tiles are clamped to the image, so every pixel
/// lands in exactly one tile. Grid cells lying wholly outside a very small
/// image are dropped, and the grid never has more cells per axis than the
/// image has pixels.
pub fn generate_tiles(width: u32, height: u32, per_axis: u32) -> Vec<Tile> {
    let per_axis = per_axis.clamp(1, width.max(height).max(1));
    let tile_w = width.div_ceil(per_axis);
    let tile_h = height.div_ceil(per_axis);

    let mut tiles = Vec::new();
    for ty in 0..per_axis {
        let y = ty * tile_h;
        if y >= height {
            break;
        }
        for tx in 0..per_axis {
            let x = tx * tile_w;
            if x >= width {
                break;
            }
            tiles.push(Tile {
                x,
                y,
                width: tile_w.min(width - x),
                height: tile_h.min(height - y),
                index: ty as usize * per_axis as usize + tx as usize,
            });
        }
    }
    tiles
}

/// Seed for the generator of tile `index`
pub fn tile_seed(seed: u64, index: usize) -> u64 {
    // splitmix64 finalizer
    let mut z = (seed ^ index as u64).wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Mean radiance over the camera's samples for pixel `(i, j)`
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let background = camera.background();
    let samples = camera.samples_per_pixel();
    let mut pixel_color = Color::zeros();
    for _ in 0..samples {
        let ray = camera.get_ray(i, j, rng);
        pixel_color += radiance(&ray, camera.max_depth(), world, &background, rng);
    }
    pixel_color / samples as f64
}

/// Render one tile; pixels come back in row-major order within the tile.
pub fn render_tile(
    tile: &Tile,
    camera: &Camera,
    world: &dyn Hittable,
    rng: &mut dyn RngCore,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(tile.pixel_count());
    for j in tile.y..tile.y + tile.height {
        for i in tile.x..tile.x + tile.width {
            pixels.push(render_pixel(camera, world, i, j, rng));
        }
    }
    pixels
}

/// Linear, sample-averaged pixel colors, rows top to bottom
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}
impl Image {
    /// Create a new image filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::zeros(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.offset(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        self.pixels[offset] = color;
    }

    /// Copy a tile's row-major pixels into place
    pub fn write_tile(&mut self, tile: &Tile, pixels: &[Color]) {
        let width = tile.width as usize;
        for (row, chunk) in pixels.chunks(width).enumerate() {
            let start = self.offset(tile.x, tile.y + row as u32);
            self.pixels[start..start + chunk.len()].copy_from_slice(chunk);
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

fn progress_bar(tiles: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::with_draw_target(Some(tiles as u64), ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} tiles") {
        bar.set_style(style);
    }
    bar
}

/// Render the whole image on a pool of `options.threads` workers.
pub fn render(camera: &Camera, world: &dyn Hittable, options: &RenderOptions) -> Result<Image> {
    let width = camera.image_width();
    let height = camera.image_height();
    let tiles = generate_tiles(width, height, options.tiles_per_axis);
    let total = tiles.len();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()?;

    info!(
        "Rendering {width}x{height} at {} spp, depth {}, {total} tiles on {} threads",
        camera.samples_per_pixel(),
        camera.max_depth(),
        pool.current_num_threads()
    );

    let start = Instant::now();
    let bar = progress_bar(total, options.show_progress);
    let processed = AtomicUsize::new(0);

    // Finished tiles go straight into the shared image, so only tiles still
    // being rendered hold pixels of their own
    let image = Mutex::new(Image::new(width, height));
    pool.install(|| {
        tiles.par_iter().for_each(|tile| {
            let mut rng = StdRng::seed_from_u64(tile_seed(options.seed, tile.index));
            let pixels = render_tile(tile, camera, world, &mut rng);
            image
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .write_tile(tile, &pixels);

            let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
            bar.set_position(done as u64);
            debug!("Processed {done} out of {total} tiles");
        })
    });
    bar.finish_and_clear();
    let image = image.into_inner().unwrap_or_else(PoisonError::into_inner);

    info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}
