//! Debris burst spawned from a source shape.
//!
//! Velocities are in per-tick units: each call to
//! [`ExplosionSimulator::step`] is one integration step regardless of how
//! much wall time passed. Elapsed time only decides when the burst ends.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::{Rng, SeedableRng, rngs::StdRng};
use snowdrift_core::Rgb;

use crate::render::DrawCommand;

/// Seconds after the trigger at which every piece of debris is retired.
pub const EXPLOSION_LIFETIME_SECS: f32 = 3.0;

/// Debris spawned per burst when not overridden.
pub const DEFAULT_DEBRIS_COUNT: usize = 1000;

/// Sphere radius reported for each piece of debris.
pub const DEBRIS_RADIUS: f32 = 0.05;

const GRAVITY: f32 = 0.015;
const DRAG: f32 = 0.99;
const SPIN_STEP: f32 = 0.1;

const SPEED_MIN: f32 = 0.1;
const SPEED_MAX: f32 = 0.3;
const UPWARD_BIAS_MIN: f32 = 0.2;
const UPWARD_BIAS_MAX: f32 = 0.5;
const DEPTH_JITTER: f32 = 0.2;

/// Axis-aligned box debris is spawned inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds3 {
    /// Build a box from any two opposite corners.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// A single piece of debris.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Debris {
    pub position: Vec3,
    /// World units per tick.
    pub velocity: Vec3,
    /// Euler angles, cosmetic only.
    pub rotation: Vec3,
}

/// Whether a burst is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExplosionPhase {
    #[default]
    Idle,
    Exploding,
}

/// A burst of debris under gravity and drag with a fixed lifetime.
#[derive(Debug)]
pub struct ExplosionSimulator {
    /// Current burst. Empty while idle.
    debris: Vec<Debris>,
    phase: ExplosionPhase,
    color: Rgb,
    rng: StdRng,
}

impl ExplosionSimulator {
    pub fn new(seed: u64) -> Self {
        Self {
            debris: Vec::new(),
            phase: ExplosionPhase::Idle,
            color: Rgb::GREEN,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Start a burst of `count` pieces from `source` offset by `base`.
    ///
    /// Triggering while a burst is already in flight discards it and starts
    /// over; the caller restarts its elapsed clock.
    pub fn trigger(&mut self, source: Bounds3, base: Vec3, count: usize, color: Rgb) {
        if self.phase == ExplosionPhase::Exploding {
            log::debug!(
                "explosion re-triggered, discarding {} in-flight debris",
                self.debris.len()
            );
        }

        self.debris.clear();
        self.debris.reserve(count);
        for _ in 0..count {
            let debris = self.spawn(&source, base);
            self.debris.push(debris);
        }
        self.color = color;
        self.phase = ExplosionPhase::Exploding;

        log::debug!("explosion triggered with {count} debris");
    }

    /// Advance the burst by one tick.
    ///
    /// Once `elapsed_secs` reaches the lifetime the whole burst is retired
    /// at once and later calls do nothing until the next trigger.
    pub fn step(&mut self, elapsed_secs: f32) -> ExplosionPhase {
        if self.phase == ExplosionPhase::Idle {
            return self.phase;
        }

        if elapsed_secs < EXPLOSION_LIFETIME_SECS {
            for d in &mut self.debris {
                d.position += d.velocity;
                d.velocity.y -= GRAVITY;
                d.velocity *= DRAG;
                d.rotation.x += SPIN_STEP;
                d.rotation.y += SPIN_STEP;
            }
        } else {
            log::debug!("explosion finished, retiring {} debris", self.debris.len());
            self.debris.clear();
            self.phase = ExplosionPhase::Idle;
        }

        self.phase
    }

    /// Append one sphere per piece of debris.
    pub fn draw(&self, out: &mut Vec<DrawCommand>) {
        out.extend(self.debris.iter().map(|d| DrawCommand::Sphere {
            position: d.position,
            rotation: d.rotation,
            radius: DEBRIS_RADIUS,
            color: self.color,
        }));
    }

    pub fn debris(&self) -> &[Debris] {
        &self.debris
    }

    pub fn phase(&self) -> ExplosionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == ExplosionPhase::Exploding
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    fn spawn(&mut self, source: &Bounds3, base: Vec3) -> Debris {
        let position = Vec3::new(
            rand_between(&mut self.rng, source.min.x, source.max.x),
            rand_between(&mut self.rng, source.min.y, source.max.y),
            rand_between(&mut self.rng, source.min.z, source.max.z),
        ) + base;

        let speed = rand_between(&mut self.rng, SPEED_MIN, SPEED_MAX);
        let angle = rand_between(&mut self.rng, 0.0, TAU);
        let upward_bias = rand_between(&mut self.rng, UPWARD_BIAS_MIN, UPWARD_BIAS_MAX);
        let depth = rand_between(&mut self.rng, -DEPTH_JITTER, DEPTH_JITTER) * speed;

        Debris {
            position,
            velocity: Vec3::new(
                angle.cos() * speed,
                angle.sin() * speed + upward_bias,
                depth,
            ),
            rotation: Vec3::ZERO,
        }
    }
}

/// Uniform sample in `[lo, hi)`; returns `lo` for a degenerate range.
fn rand_between(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}
