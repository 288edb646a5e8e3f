//! Snow accumulation and debris simulation for snowdrift.
//!
//! Two independent simulations advanced once per frame:
//! falling snow that settles into a per-column height field, and a burst of
//! debris under gravity and drag that expires as a batch. Neither draws
//! anything itself; each frame is described as a list of [`DrawCommand`]s.

mod backdrop;
mod explosion;
mod heightfield;
mod render;
mod snowfall;

pub use backdrop::{Backdrop, time_seed};
pub use explosion::{
    Bounds3, DEBRIS_RADIUS, DEFAULT_DEBRIS_COUNT, Debris, EXPLOSION_LIFETIME_SECS,
    ExplosionPhase, ExplosionSimulator,
};
pub use heightfield::{DEFAULT_MAX_FRACTION, DEPOSIT_AMOUNT, DEPOSIT_RANGE, HeightFieldAccumulator};
pub use render::{DrawCommand, surface_outline};
pub use snowfall::{Flake, MAX_FLAKES, SnowfallSimulator, flake_count_for};

pub use glam::Vec3;
