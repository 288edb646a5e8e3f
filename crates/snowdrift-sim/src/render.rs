//! Draw commands produced by the simulations each frame.
//!
//! The simulations never touch a drawing surface. They describe a frame as
//! a list of commands which a front-end replays on whatever surface it owns.

use glam::Vec3;
use snowdrift_core::Rgb;

/// A single drawing instruction in surface pixel space (y grows down),
/// except for [`DrawCommand::Sphere`] which is in world space (y grows up).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A closed polygon to fill. The outline starts and ends on the
    /// baseline, so filling it paints the snow pile from the bottom up.
    FillPath { outline: Vec<(f32, f32)>, color: Rgb },
    /// A filled circle (a falling flake).
    FillCircle {
        x: f32,
        y: f32,
        radius: f32,
        color: Rgb,
    },
    /// A positioned, rotated sphere (a piece of debris).
    Sphere {
        position: Vec3,
        rotation: Vec3,
        radius: f32,
        color: Rgb,
    },
}

impl DrawCommand {
    pub fn color(&self) -> Rgb {
        match self {
            DrawCommand::FillPath { color, .. }
            | DrawCommand::FillCircle { color, .. }
            | DrawCommand::Sphere { color, .. } => *color,
        }
    }
}

/// Build the closed outline of a height curve sampled once per column.
///
/// The outline runs from the bottom-left corner up to the first sample,
/// across every sample, and back down the right edge to the baseline.
pub fn surface_outline(samples: &[f32], width: f32, baseline: f32) -> Vec<(f32, f32)> {
    let mut outline = Vec::with_capacity(samples.len() + 3);
    outline.push((0.0, baseline));
    outline.extend(samples.iter().enumerate().map(|(x, &y)| (x as f32, y)));
    if let Some(&last) = samples.last() {
        outline.push((width, last));
    }
    outline.push((width, baseline));
    outline
}
