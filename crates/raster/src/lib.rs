//! Tile-based parallel circle rasterizer
//!
//! CPU rasterizer for moving circle particles:
//! - Particles are binned to fixed-size screen tiles (spatial binning)
//! - Each tile is rasterized as an independent rayon work unit
//! - Tiles own disjoint pixel regions, so the shared framebuffer needs
//!   no locks or atomics during the parallel pass
//!
//! This crate is framework-agnostic - it handles simulation and
//! rasterization only. Use the `screensaver` crate for presentation
//! with Macroquad.

pub mod framebuffer;
pub mod particle;
pub mod physics;
pub mod render;
pub mod tile;

pub use framebuffer::{Framebuffer, PixelFormat};
pub use particle::{Particles, SpawnConfig};
pub use render::{render_serial, TiledRenderer};
pub use tile::{TileGrid, TileRect, DEFAULT_TILE_SIZE};
