//! Falling snow that settles into the height field.

use rand::{Rng, SeedableRng, rngs::StdRng};
use snowdrift_core::{Rgb, SimError};

use crate::heightfield::{DEFAULT_MAX_FRACTION, HeightFieldAccumulator};
use crate::render::{DrawCommand, surface_outline};

/// Hard upper bound on the flake pool regardless of intensity.
pub const MAX_FLAKES: usize = 300;

/// Share of the surface height new flakes are scattered over at spawn.
const SPAWN_BAND: f32 = 0.7;

const RADIUS_MIN: f32 = 1.0;
const RADIUS_MAX: f32 = 4.0;
const SPEED_MIN: f32 = 0.5;
const SPEED_MAX: f32 = 1.5;
const DRIFT_MAX: f32 = 0.25;

/// Number of flakes for a given snowfall intensity.
///
/// Negative or NaN intensities yield an empty pool; anything larger than
/// the cap, infinity included, yields [`MAX_FLAKES`].
pub fn flake_count_for(intensity: f32) -> usize {
    if intensity.is_nan() || intensity <= 0.0 {
        return 0;
    }
    ((intensity * 2.0).floor() as usize).min(MAX_FLAKES)
}

/// A single falling flake.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Flake {
    pub x: f32,
    pub y: f32,
    /// Fixed at spawn.
    pub radius: f32,
    /// Pixels per tick, fixed at spawn.
    pub fall_speed: f32,
    /// Horizontal wind in pixels per tick, fixed at spawn.
    pub drift: f32,
}

/// Snowfall over a deformable snow pile.
///
/// The flake pool is allocated once per [`configure`](Self::configure) and
/// recycled in place: a flake that lands is moved back above the surface.
#[derive(Debug)]
pub struct SnowfallSimulator {
    /// Settled snow.
    accumulator: HeightFieldAccumulator,
    /// Fixed-size flake pool.
    flakes: Box<[Flake]>,
    /// Color of both flakes and the pile.
    color: Rgb,
    /// Pile height limit as a fraction of the surface height.
    max_fraction: f32,
    /// Surface size, `None` until the first resize.
    size: Option<(f32, f32)>,
    rng: StdRng,
}

impl SnowfallSimulator {
    /// Create an unsized, empty simulator with a deterministic random source.
    pub fn new(seed: u64) -> Self {
        Self {
            accumulator: HeightFieldAccumulator::new(),
            flakes: Box::default(),
            color: Rgb::WHITE,
            max_fraction: DEFAULT_MAX_FRACTION,
            size: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Set how high the pile may grow. Takes effect on the next resize.
    pub fn with_max_fraction(mut self, max_fraction: f32) -> Self {
        self.max_fraction = max_fraction;
        self
    }

    /// Rebuild the flake pool for a new intensity and color.
    pub fn configure(&mut self, intensity: f32, color: Rgb) {
        let count = flake_count_for(intensity);
        if intensity * 2.0 > MAX_FLAKES as f32 {
            log::warn!("snow intensity {intensity} capped at {MAX_FLAKES} flakes");
        }

        self.color = color;
        self.flakes = vec![Flake::default(); count].into_boxed_slice();
        if self.size.is_some() {
            self.scatter_all();
        }
        log::debug!("snowfall configured with {count} flakes, color {}", color.to_hex());
    }

    /// Change only the color, keeping the pool and the pile.
    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// Resize the surface. Flattens the pile and re-scatters every flake.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.accumulator.resize(width, height, self.max_fraction);
        self.size = Some((width.max(1) as f32, height.max(1) as f32));
        self.scatter_all();
    }

    /// Advance every flake by one tick.
    ///
    /// Returns how many flakes landed on the pile this tick.
    pub fn step(&mut self) -> Result<usize, SimError> {
        let (width, _) = self.size.ok_or(SimError::NotSized)?;
        let mut landed = 0;

        for flake in self.flakes.iter_mut() {
            flake.y += flake.fall_speed;
            flake.x += flake.drift;

            if flake.x + flake.radius > width {
                flake.x = flake.radius;
            } else if flake.x - flake.radius < 0.0 {
                flake.x = width - flake.radius;
            }

            // Collision runs on the raw field; smoothing is for drawing only.
            if flake.y + flake.radius >= self.accumulator.height_at(flake.x) {
                self.accumulator.deposit(flake.x.floor() as i64);
                flake.y = -flake.radius;
                flake.x = self.rng.random_range(0.0..width);
                landed += 1;
            }
        }

        Ok(landed)
    }

    /// Append this frame's draw commands: the pile first, then the flakes.
    pub fn draw(&self, out: &mut Vec<DrawCommand>) {
        let Some((width, _)) = self.size else {
            return;
        };

        out.push(DrawCommand::FillPath {
            outline: surface_outline(
                &self.accumulator.snapshot_smoothed(),
                width,
                self.accumulator.baseline(),
            ),
            color: self.color,
        });
        out.extend(self.flakes.iter().map(|f| DrawCommand::FillCircle {
            x: f.x,
            y: f.y,
            radius: f.radius,
            color: self.color,
        }));
    }

    /// Flatten the pile without touching the flakes.
    pub fn clear_pile(&mut self) {
        self.accumulator.clear();
    }

    pub fn flakes(&self) -> &[Flake] {
        &self.flakes
    }

    pub fn accumulator(&self) -> &HeightFieldAccumulator {
        &self.accumulator
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn is_sized(&self) -> bool {
        self.size.is_some()
    }

    fn scatter_all(&mut self) {
        let (width, height) = self.size.unwrap_or((1.0, 1.0));
        for flake in self.flakes.iter_mut() {
            *flake = Flake {
                x: self.rng.random_range(0.0..width),
                y: self.rng.random_range(0.0..height * SPAWN_BAND),
                radius: self.rng.random_range(RADIUS_MIN..RADIUS_MAX),
                fall_speed: self.rng.random_range(SPEED_MIN..SPEED_MAX),
                drift: self.rng.random_range(-DRIFT_MAX..DRIFT_MAX),
            };
        }
    }
}
