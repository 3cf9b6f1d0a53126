//! Particle motion: Euler integration and wall bounces.
//!
//! Runs as two axis passes over the SoA columns, each parallelized with
//! rayon. Bounces damp the reflected velocity slightly and snap the circle
//! back inside the bounds; the step reports how many bounces happened so
//! the frontend can surface a bounces/second figure.

use glam::Vec2;
use rayon::prelude::*;

use crate::particle::Particles;

/// Velocity retained after a wall bounce.
pub const WALL_DAMPING: f32 = 0.95;

/// Advance every particle by `dt` seconds inside `[0, bounds.x] x
/// [0, bounds.y]`, returning the number of wall bounces.
///
/// A circle touching a wall is snapped flush against it and its velocity
/// component reflected with [`WALL_DAMPING`]. Each axis bounces at most
/// once per step.
pub fn step(particles: &mut Particles, bounds: Vec2, dt: f32) -> u32 {
    let horizontal: u32 = particles
        .x
        .par_iter_mut()
        .zip(particles.vx.par_iter_mut())
        .zip(particles.radius.par_iter())
        .map(|((x, vx), &radius)| {
            let r = radius as f32;
            *x += *vx * dt;
            if *x - r <= 0.0 {
                *x = r;
                *vx = -*vx * WALL_DAMPING;
                1
            } else if *x + r >= bounds.x {
                *x = bounds.x - r;
                *vx = -*vx * WALL_DAMPING;
                1
            } else {
                0
            }
        })
        .sum();

    let vertical: u32 = particles
        .y
        .par_iter_mut()
        .zip(particles.vy.par_iter_mut())
        .zip(particles.radius.par_iter())
        .map(|((y, vy), &radius)| {
            let r = radius as f32;
            *y += *vy * dt;
            if *y - r <= 0.0 {
                *y = r;
                *vy = -*vy * WALL_DAMPING;
                1
            } else if *y + r >= bounds.y {
                *y = bounds.y - r;
                *vy = -*vy * WALL_DAMPING;
                1
            } else {
                0
            }
        })
        .sum();

    horizontal + vertical
}

/// Total mechanical energy of the system, by parallel reduction.
///
/// Kinetic term `0.5 * r^2 * v^2` plus potential term `9.8 * r^2 * y`
/// (y grows downward, so this measures distance fallen; only useful as a
/// relative diagnostic between frames).
pub fn total_energy(particles: &Particles) -> f64 {
    let kinetic: f64 = particles
        .vx
        .par_iter()
        .zip(particles.vy.par_iter())
        .zip(particles.radius.par_iter())
        .map(|((&vx, &vy), &radius)| {
            let r = radius as f64;
            0.5 * r * r * (vx as f64 * vx as f64 + vy as f64 * vy as f64)
        })
        .sum();

    let potential: f64 = particles
        .y
        .par_iter()
        .zip(particles.radius.par_iter())
        .map(|(&y, &radius)| {
            let r = radius as f64;
            9.8 * r * r * y as f64
        })
        .sum();

    kinetic + potential
}
