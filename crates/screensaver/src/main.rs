//! Bouncing-circles screensaver.
//!
//! Moving circle particles rasterized on the CPU by the tile-parallel
//! renderer in the `raster` crate, then uploaded as a texture each frame.
//!
//! Controls: Space pauses, R respawns the particles, Esc quits.

use clap::Parser;
use glam::Vec2;
use log::info;
// Explicit imports: the macroquad prelude glob re-exports its own `rand`
// and `glam`, which would collide with the simulation-facing crates.
use macroquad::prelude::{
    draw_texture_ex, get_frame_time, is_key_pressed, next_frame, screen_height, screen_width,
    vec2, Conf, DrawTextureParams, FilterMode, Image, KeyCode, Texture2D, BLACK, WHITE,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use raster::{physics, Framebuffer, Particles, PixelFormat, SpawnConfig, TiledRenderer};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Tile-parallel circle screensaver
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of circles
    #[arg(short, long, default_value = "200")]
    n: usize,

    /// Window width in pixels (min 640)
    #[arg(long, default_value = "800")]
    width: usize,

    /// Window height in pixels (min 480)
    #[arg(long, default_value = "600")]
    height: usize,

    /// Target frames per second (clamped to 30..=240)
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Tile edge length for the parallel rasterizer
    #[arg(long, default_value = "32")]
    tile_size: usize,

    /// RNG seed for reproducible runs (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn clamped() -> Self {
        let mut args = Self::parse();
        args.n = args.n.max(1);
        args.width = args.width.max(640);
        args.height = args.height.max(480);
        args.fps = args.fps.clamp(30, 240);
        args.tile_size = args.tile_size.max(1);
        args
    }
}

static ARGS: OnceLock<Args> = OnceLock::new();

// Packed ABGR: little-endian byte order is R,G,B,A - what the RGBA8
// texture upload consumes.
const FORMAT: PixelFormat = PixelFormat::Abgr8888;

fn background() -> u32 {
    FORMAT.pack(15, 15, 30, 255)
}

fn window_conf() -> Conf {
    let args = ARGS.get_or_init(Args::clamped);
    Conf {
        window_title: "Screensaver - tiled parallel rasterizer".to_owned(),
        window_width: args.width as i32,
        window_height: args.height as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    let args = ARGS.get().expect("window_conf parsed the args");

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        "{} circles at {}x{}, tile size {}, seed {}",
        args.n, args.width, args.height, args.tile_size, seed
    );

    let bounds = Vec2::new(args.width as f32, args.height as f32);
    let spawn = SpawnConfig {
        format: FORMAT,
        ..SpawnConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut particles = Particles::with_capacity(args.n);
    particles.spawn_random(args.n, bounds, &spawn, &mut rng);

    let mut fb = Framebuffer::new(args.width, args.height);
    let mut renderer = TiledRenderer::new(args.tile_size);

    let mut image = Image::gen_image_color(args.width as u16, args.height as u16, BLACK);
    let texture = Texture2D::from_image(&image);
    texture.set_filter(FilterMode::Nearest); // Crisp pixels, no smoothing

    let target_dt = 1.0 / args.fps as f32;
    let mut paused = false;
    let mut frames = 0u32;
    let mut bounces = 0u32;
    let mut fps_timer = Instant::now();
    let mut seconds = 0u64;

    loop {
        let frame_start = Instant::now();

        // --- INPUT ---
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::Space) {
            paused = !paused;
        }
        if is_key_pressed(KeyCode::R) {
            particles.clear();
            particles.spawn_random(args.n, bounds, &spawn, &mut rng);
        }

        // --- SIMULATION ---
        // Clamp dt to 50ms so a stall doesn't teleport circles through walls
        let dt = get_frame_time().min(0.05);
        if !paused {
            bounces += physics::step(&mut particles, bounds, dt);
        }

        // --- RENDER ---
        fb.clear(background());
        renderer.render(&particles, &mut fb);

        // --- PRESENT ---
        image.bytes.copy_from_slice(bytemuck::cast_slice(&fb.pixels));
        texture.update(&image);
        draw_texture_ex(
            &texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );

        // --- PACING & STATS ---
        frames += 1;
        let frame_time = frame_start.elapsed().as_secs_f32();
        if frame_time < target_dt {
            std::thread::sleep(Duration::from_secs_f32(target_dt - frame_time));
        }

        if fps_timer.elapsed() >= Duration::from_secs(1) {
            seconds += 1;
            println!(
                "[t={}s] FPS ~ {} | N={} | {}x{} | bounces/s ~ {}",
                seconds,
                frames,
                particles.len(),
                args.width,
                args.height,
                bounces / seconds.max(1) as u32
            );
            frames = 0;
            fps_timer = Instant::now();
        }

        next_frame().await;
    }
}
