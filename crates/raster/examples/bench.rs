//! Quick benchmark comparing serial and tiled rendering.
//!
//! Run with: cargo run --release --example bench -p raster
//! Profile with: cargo flamegraph --example bench -p raster

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use raster::{render_serial, Framebuffer, Particles, SpawnConfig, TiledRenderer};
use std::time::Instant;

fn main() {
    const WIDTH: usize = 1280;
    const HEIGHT: usize = 720;
    const N: usize = 5000;
    const FRAMES: usize = 300; // 5 seconds at 60 FPS
    const DT: f32 = 1.0 / 60.0;
    const BACKGROUND: u32 = 0xFF1E0F0F;

    let bounds = Vec2::new(WIDTH as f32, HEIGHT as f32);

    println!("Setting up {}x{} framebuffer with {} particles", WIDTH, HEIGHT, N);
    let mut particles = Particles::with_capacity(N);
    let mut rng = ChaCha8Rng::seed_from_u64(0xC1BC1E5);
    particles.spawn_random(N, bounds, &SpawnConfig::default(), &mut rng);

    let mut fb = Framebuffer::new(WIDTH, HEIGHT);
    let mut renderer = TiledRenderer::default();

    // Warm up (populates rayon's pool and the bin scratch vectors)
    println!("Warming up (30 frames)...");
    for _ in 0..30 {
        raster::physics::step(&mut particles, bounds, DT);
        fb.clear(BACKGROUND);
        renderer.render(&particles, &mut fb);
    }

    println!("Running {} tiled frames...", FRAMES);
    let start = Instant::now();
    for _ in 0..FRAMES {
        raster::physics::step(&mut particles, bounds, DT);
        fb.clear(BACKGROUND);
        renderer.render(&particles, &mut fb);
    }
    let tiled = start.elapsed();

    println!("Running {} serial frames...", FRAMES);
    let start = Instant::now();
    for _ in 0..FRAMES {
        raster::physics::step(&mut particles, bounds, DT);
        fb.clear(BACKGROUND);
        render_serial(&particles, &mut fb);
    }
    let serial = start.elapsed();

    let tiled_ms = tiled.as_secs_f64() * 1000.0 / FRAMES as f64;
    let serial_ms = serial.as_secs_f64() * 1000.0 / FRAMES as f64;

    println!("\n=== Results ===");
    println!("Tiled:  {:.3}ms/frame ({:.1} FPS)", tiled_ms, 1000.0 / tiled_ms);
    println!("Serial: {:.3}ms/frame ({:.1} FPS)", serial_ms, 1000.0 / serial_ms);
    println!("Speedup: {:.2}x on {} threads", serial_ms / tiled_ms, rayon::current_num_threads());
}
