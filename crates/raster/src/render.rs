//! Scanline circle fill and the parallel tile dispatcher.
//!
//! Each frame: bin particles to tiles, carve the framebuffer into one
//! exclusive view per tile, then rasterize every tile as its own rayon
//! work unit. The views are built from disjoint `split_at_mut` sub-slices,
//! so the borrow checker proves that no two tiles can write the same
//! pixel - the pixel array needs no locks or atomics.
//!
//! Pixel results are identical to processing the tiles in any serial
//! order; within a tile, bin order (ascending particle index) decides
//! which color wins an overlapped pixel.

use rayon::prelude::*;

use crate::framebuffer::Framebuffer;
use crate::particle::Particles;
use crate::tile::{TileGrid, TileRect, DEFAULT_TILE_SIZE};

/// Exclusive view of one tile's pixels: one `&mut` row segment per
/// scanline, each covering `[x0, x1)` of that row.
struct TileView<'a> {
    rect: TileRect,
    rows: Vec<&'a mut [u32]>,
}

impl TileView<'_> {
    /// Fill `[xa, xb]` of scanline `y` (absolute coordinates, already
    /// clipped to the tile rectangle by the caller).
    #[inline]
    fn fill_row(&mut self, y: i32, xa: i32, xb: i32, color: u32) {
        debug_assert!(y >= self.rect.y0 && y < self.rect.y1);
        debug_assert!(xa >= self.rect.x0 && xb < self.rect.x1);
        self.rows[(y - self.rect.y0) as usize]
            [(xa - self.rect.x0) as usize..=(xb - self.rect.x0) as usize]
            .fill(color);
    }
}

/// Carve the pixel buffer into one exclusive view per tile.
///
/// Walks the buffer row by row, splitting each scanline at tile column
/// boundaries and handing every segment to the view of the tile that owns
/// it. Consumes the `&mut` borrow of the whole buffer and returns provably
/// disjoint sub-slices.
fn carve_tile_views<'a>(pixels: &'a mut [u32], grid: &TileGrid) -> Vec<TileView<'a>> {
    debug_assert_eq!(pixels.len(), grid.width * grid.height);
    let mut views: Vec<TileView<'a>> = (0..grid.total_tiles())
        .map(|tid| {
            let rect = grid.tile_rect(tid);
            TileView {
                rect,
                rows: Vec::with_capacity(rect.height()),
            }
        })
        .collect();

    if grid.width == 0 || grid.height == 0 {
        return views;
    }

    for (y, row) in pixels.chunks_mut(grid.width).enumerate() {
        let ty = y / grid.tile_size;
        let mut rest = row;
        let mut x = 0;
        for tx in 0..grid.tiles_x {
            let x1 = ((tx + 1) * grid.tile_size).min(grid.width);
            let (segment, tail) = std::mem::take(&mut rest).split_at_mut(x1 - x);
            rest = tail;
            x = x1;
            views[ty * grid.tiles_x + tx].rows.push(segment);
        }
    }
    views
}

/// Scanline-fill the circle `(cx, cy, r)` clipped to the view's tile.
///
/// Per row, the half-width comes from the Pythagorean relation
/// `dx = floor(sqrt(r^2 - dy^2))`; the span is then intersected with the
/// tile rectangle. Out-of-tile pixels are silently clipped away, never
/// written, so a particle spanning several tiles is painted piecewise
/// with no seam and no double write.
fn draw_circle_clipped(view: &mut TileView<'_>, cx: i32, cy: i32, r: i32, color: u32) {
    let y_from = (cy - r).max(view.rect.y0);
    let y_to = (cy + r).min(view.rect.y1 - 1);
    for yy in y_from..=y_to {
        let dy = yy - cy;
        let dx = ((r as f64) * (r as f64) - (dy as f64) * (dy as f64)).sqrt().floor() as i32;
        let xx0 = (cx - dx).max(view.rect.x0);
        let xx1 = (cx + dx).min(view.rect.x1 - 1);
        if xx0 <= xx1 {
            view.fill_row(yy, xx0, xx1, color);
        }
    }
}

/// Tile-parallel renderer with per-frame scratch reuse.
pub struct TiledRenderer {
    tile_size: usize,
    bins: Vec<Vec<u32>>,
}

impl Default for TiledRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}

impl TiledRenderer {
    pub fn new(tile_size: usize) -> Self {
        Self {
            tile_size,
            bins: Vec::new(),
        }
    }

    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Rasterize every particle into `fb`, one rayon work unit per tile.
    ///
    /// Does not clear: the caller clears to its background color first.
    /// Binning completes fully before any tile is dispatched, so the bins
    /// are read-only during the parallel pass.
    pub fn render(&mut self, particles: &Particles, fb: &mut Framebuffer) {
        let grid = TileGrid::new(fb.width, fb.height, self.tile_size);
        grid.bin_into(particles, &mut self.bins);

        let views = carve_tile_views(&mut fb.pixels, &grid);
        views
            .into_par_iter()
            .zip(self.bins.par_iter())
            .for_each(|(mut view, bin)| {
                for &i in bin {
                    let i = i as usize;
                    draw_circle_clipped(
                        &mut view,
                        particles.x[i].round() as i32,
                        particles.y[i].round() as i32,
                        particles.radius[i],
                        particles.color[i],
                    );
                }
            });
    }
}

/// Single-threaded reference renderer: every particle scanline-filled over
/// the whole framebuffer, clipped only by the framebuffer bounds.
///
/// Produces pixel-identical output to [`TiledRenderer::render`] for any
/// tile size; the tests lean on that equivalence.
pub fn render_serial(particles: &Particles, fb: &mut Framebuffer) {
    let (w, h) = (fb.width as i32, fb.height as i32);
    for i in 0..particles.len() {
        let cx = particles.x[i].round() as i32;
        let cy = particles.y[i].round() as i32;
        let r = particles.radius[i];
        let color = particles.color[i];

        let y_from = (cy - r).max(0);
        let y_to = (cy + r).min(h - 1);
        for yy in y_from..=y_to {
            let dy = yy - cy;
            let dx = ((r as f64) * (r as f64) - (dy as f64) * (dy as f64)).sqrt().floor() as i32;
            let xx0 = (cx - dx).max(0);
            let xx1 = (cx + dx).min(w - 1);
            if xx0 <= xx1 {
                let row = yy as usize * fb.width;
                fb.pixels[row + xx0 as usize..=row + xx1 as usize].fill(color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn carved_views_cover_every_pixel_exactly_once() {
        // 50x35 with tile 16 exercises clipped edge tiles
        let grid = TileGrid::new(50, 35, 16);
        let mut pixels = vec![0u32; 50 * 35];
        {
            let mut views = carve_tile_views(&mut pixels, &grid);
            for view in &mut views {
                assert_eq!(view.rows.len(), view.rect.height());
                for row in &mut view.rows {
                    assert_eq!(row.len(), view.rect.width());
                    for px in row.iter_mut() {
                        *px += 1;
                    }
                }
            }
        }
        assert!(pixels.iter().all(|&p| p == 1));
    }

    #[test]
    fn clipped_fill_writes_only_inside_the_tile() {
        let grid = TileGrid::new(64, 64, 32);
        let mut pixels = vec![0u32; 64 * 64];
        {
            let mut views = carve_tile_views(&mut pixels, &grid);
            // Circle centered on the seam, drawn only into tile (0,0)
            draw_circle_clipped(&mut views[0], 32, 16, 10, 0xFF);
        }
        for y in 0..64i32 {
            for x in 0..64i32 {
                let painted = pixels[y as usize * 64 + x as usize] != 0;
                let inside_disc = (x - 32).pow(2) + (y - 16).pow(2) <= 100;
                let inside_tile = x < 32 && y < 32;
                assert_eq!(painted, inside_disc && inside_tile, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn scanline_fill_matches_disc_membership() {
        let mut particles = Particles::new();
        particles.push(Vec2::new(20.0, 15.0), Vec2::ZERO, 9, 0xABCD);
        let mut fb = Framebuffer::new(40, 30);
        render_serial(&particles, &mut fb);

        for y in 0..30i32 {
            for x in 0..40i32 {
                let painted = fb.pixel(x, y) == Some(0xABCD);
                let inside = (x - 20).pow(2) + (y - 15).pow(2) <= 81;
                assert_eq!(painted, inside, "pixel ({x}, {y})");
            }
        }
    }
}
