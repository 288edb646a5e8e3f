//! Simulation error type.

use std::fmt;

/// Errors reported by the simulation when its calling contract is violated.
///
/// Numeric inputs are always clamped, so the only failure is a caller
/// stepping a simulation that has never been given a surface size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// `step` was called before the first `resize`.
    NotSized,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::NotSized => write!(f, "simulation stepped before a surface size was set"),
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert!(SimError::NotSized.to_string().contains("surface size"));
    }
}
