//! Frame-driven composition of the snowfall and the explosion.

use glam::Vec3;
use snowdrift_core::{Rgb, SimError};

use crate::explosion::{Bounds3, ExplosionPhase, ExplosionSimulator};
use crate::render::DrawCommand;
use crate::snowfall::SnowfallSimulator;

/// Seed taken from the wall clock, for runs that don't need to be repeatable.
pub fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Both simulations behind one tick.
///
/// The host resizes between frames and calls [`tick`](Self::tick) once per
/// frame with a monotonically increasing timestamp, then replays
/// [`draw_commands`](Self::draw_commands).
#[derive(Debug)]
pub struct Backdrop {
    snowfall: SnowfallSimulator,
    explosion: ExplosionSimulator,
    /// Last applied surface width.
    last_width: u32,
    /// Last applied surface height.
    last_height: u32,
    /// Timestamp of the most recent trigger in milliseconds.
    triggered_at_ms: u64,
    /// Timestamp of the most recent tick in milliseconds.
    last_tick_ms: u64,
}

impl Backdrop {
    /// Create a backdrop whose randomness derives from `seed`.
    pub fn new(seed: u64, max_fraction: f32) -> Self {
        Self {
            snowfall: SnowfallSimulator::new(seed).with_max_fraction(max_fraction),
            explosion: ExplosionSimulator::new(seed.wrapping_mul(31).wrapping_add(7)),
            last_width: 0,
            last_height: 0,
            triggered_at_ms: 0,
            last_tick_ms: 0,
        }
    }

    /// Apply a surface size. Does nothing if the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        let dimensions_changed = width != self.last_width || height != self.last_height;
        if dimensions_changed || !self.snowfall.is_sized() {
            self.snowfall.resize(width, height);
            self.last_width = width;
            self.last_height = height;
        }
    }

    /// Rebuild the flake pool for a new intensity and color.
    pub fn configure_snow(&mut self, intensity: f32, color: Rgb) {
        self.snowfall.configure(intensity, color);
    }

    pub fn set_snow_color(&mut self, color: Rgb) {
        self.snowfall.set_color(color);
    }

    pub fn clear_pile(&mut self) {
        self.snowfall.clear_pile();
    }

    /// Start a burst now. The lifetime is measured from `now_ms`.
    pub fn trigger_explosion(
        &mut self,
        now_ms: u64,
        source: Bounds3,
        base: Vec3,
        count: usize,
        color: Rgb,
    ) {
        self.explosion.trigger(source, base, count, color);
        self.triggered_at_ms = now_ms;
    }

    /// Advance both simulations by one frame.
    pub fn tick(&mut self, now_ms: u64) -> Result<ExplosionPhase, SimError> {
        self.last_tick_ms = now_ms;
        self.snowfall.step()?;

        let elapsed_secs = now_ms.saturating_sub(self.triggered_at_ms) as f32 / 1000.0;
        Ok(self.explosion.step(elapsed_secs))
    }

    /// Everything to draw this frame, back to front.
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let mut out = Vec::with_capacity(
            self.snowfall.flakes().len() + self.explosion.debris().len() + 1,
        );
        self.snowfall.draw(&mut out);
        self.explosion.draw(&mut out);
        out
    }

    pub fn snowfall(&self) -> &SnowfallSimulator {
        &self.snowfall
    }

    pub fn explosion(&self) -> &ExplosionSimulator {
        &self.explosion
    }

    pub fn last_tick_ms(&self) -> u64 {
        self.last_tick_ms
    }

    pub fn size(&self) -> (u32, u32) {
        (self.last_width, self.last_height)
    }
}
