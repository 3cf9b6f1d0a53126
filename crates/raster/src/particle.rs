//! Circle particles, stored column-oriented (structure of arrays).
//!
//! Positions and velocities are continuous; radii are whole pixels and
//! colors are packed 32-bit values. The rasterizer reads the store
//! immutably during a frame; the physics step mutates positions and
//! velocities between frames.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::framebuffer::PixelFormat;

/// Parameters for random particle generation.
#[derive(Clone, Copy, Debug)]
pub struct SpawnConfig {
    /// Radius range in pixels, inclusive.
    pub min_radius: i32,
    pub max_radius: i32,
    /// Speed range in pixels/second, uniform at a uniform random angle.
    pub min_speed: f32,
    pub max_speed: f32,
    /// Channel packing for the generated colors.
    pub format: PixelFormat,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            min_radius: 4,
            max_radius: 12,
            min_speed: 60.0,
            max_speed: 180.0,
            format: PixelFormat::Abgr8888,
        }
    }
}

/// Column-oriented particle store.
///
/// Separate arrays per field for cache locality in the per-axis physics
/// passes and the binning scan.
#[derive(Clone, Debug, Default)]
pub struct Particles {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub vx: Vec<f32>,
    pub vy: Vec<f32>,
    pub radius: Vec<i32>,
    pub color: Vec<u32>,
}

impl Particles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            vx: Vec::with_capacity(capacity),
            vy: Vec::with_capacity(capacity),
            radius: Vec::with_capacity(capacity),
            color: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn push(&mut self, position: Vec2, velocity: Vec2, radius: i32, color: u32) {
        self.x.push(position.x);
        self.y.push(position.y);
        self.vx.push(velocity.x);
        self.vy.push(velocity.y);
        self.radius.push(radius);
        self.color.push(color);
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec2 {
        Vec2::new(self.x[i], self.y[i])
    }

    #[inline]
    pub fn velocity(&self, i: usize) -> Vec2 {
        Vec2::new(self.vx[i], self.vy[i])
    }

    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.vx.clear();
        self.vy.clear();
        self.radius.clear();
        self.color.clear();
    }

    /// Append `n` random particles inside `bounds` (width, height in pixels).
    ///
    /// Positions are clamped so every circle starts fully on screen. The
    /// RNG is passed in so callers can seed it for reproducible runs.
    pub fn spawn_random(
        &mut self,
        n: usize,
        bounds: Vec2,
        config: &SpawnConfig,
        rng: &mut impl Rng,
    ) {
        self.x.reserve(n);
        self.y.reserve(n);
        self.vx.reserve(n);
        self.vy.reserve(n);
        self.radius.reserve(n);
        self.color.reserve(n);

        for _ in 0..n {
            let radius = rng.gen_range(config.min_radius..=config.max_radius);
            let r = radius as f32;
            let x = rng.gen_range(0.0..bounds.x).clamp(r, bounds.x - r);
            let y = rng.gen_range(0.0..bounds.y).clamp(r, bounds.y - r);

            let angle = rng.gen_range(0.0..TAU);
            let speed = rng.gen_range(config.min_speed..config.max_speed);
            let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;

            let color = config.format.pack(
                rng.gen_range(60..=255),
                rng.gen_range(60..=255),
                rng.gen_range(60..=255),
                255,
            );

            self.push(Vec2::new(x, y), velocity, radius, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn spawn_stays_fully_inside_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut particles = Particles::new();
        let bounds = Vec2::new(200.0, 150.0);
        particles.spawn_random(500, bounds, &SpawnConfig::default(), &mut rng);

        assert_eq!(particles.len(), 500);
        for i in 0..particles.len() {
            let r = particles.radius[i] as f32;
            assert!(particles.x[i] >= r && particles.x[i] <= bounds.x - r);
            assert!(particles.y[i] >= r && particles.y[i] <= bounds.y - r);
            assert!((4..=12).contains(&particles.radius[i]));

            let speed = particles.velocity(i).length();
            assert!((59.99..180.01).contains(&speed), "speed {} out of range", speed);
        }
    }

    #[test]
    fn spawn_is_deterministic_for_a_fixed_seed() {
        let config = SpawnConfig::default();
        let mut a = Particles::new();
        let mut b = Particles::new();
        a.spawn_random(64, Vec2::new(800.0, 600.0), &config, &mut ChaCha8Rng::seed_from_u64(42));
        b.spawn_random(64, Vec2::new(800.0, 600.0), &config, &mut ChaCha8Rng::seed_from_u64(42));

        assert_eq!(a.x, b.x);
        assert_eq!(a.y, b.y);
        assert_eq!(a.vx, b.vx);
        assert_eq!(a.vy, b.vy);
        assert_eq!(a.radius, b.radius);
        assert_eq!(a.color, b.color);
    }

    #[test]
    fn spawned_colors_have_opaque_alpha() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut particles = Particles::new();
        particles.spawn_random(
            100,
            Vec2::new(320.0, 240.0),
            &SpawnConfig::default(),
            &mut rng,
        );
        for &c in &particles.color {
            assert_eq!(c >> 24, 0xFF, "alpha byte must be opaque in ABGR packing");
        }
    }
}
