//! Core types for the snowdrift app.
//!
//! Shared by the simulation, configuration and terminal front-end crates:
//! colors and the palettes the user can cycle through, plus the error
//! reported when the simulation is driven out of order.

mod color;
mod error;

pub use color::{ParseColorError, Rgb, SnowPalette};
pub use error::SimError;
