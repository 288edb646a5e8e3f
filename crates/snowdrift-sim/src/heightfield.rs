//! Settled snow surface as a per-column height field.
//!
//! Heights are y coordinates measured from the top of the surface, so a
//! column "fills up" as its value decreases from the baseline towards the
//! ceiling.

/// Horizontal reach of a single deposit, in pixels.
pub const DEPOSIT_RANGE: i64 = 100;

/// Height removed at the center column by a single deposit, in pixels.
pub const DEPOSIT_AMOUNT: f32 = 2.5;

/// Fraction of the surface height snow may pile up to when unset.
pub const DEFAULT_MAX_FRACTION: f32 = 0.3;

/// Per-column settle heights of the snow pile.
#[derive(Debug, Clone, Default)]
pub struct HeightFieldAccumulator {
    /// Settled surface y per pixel column.
    heights: Vec<f32>,
    /// Bottom of the surface (canvas height).
    baseline: f32,
    /// Highest the pile may reach.
    surface_ceiling: f32,
}

impl HeightFieldAccumulator {
    /// Create an empty field. Call [`resize`](Self::resize) before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reinitialize the field to a flat surface at the new size.
    ///
    /// Width and height floor at 1. `max_fraction` is clamped into `(0, 1]`.
    pub fn resize(&mut self, width: u32, height: u32, max_fraction: f32) {
        let width = width.max(1) as usize;
        let baseline = height.max(1) as f32;
        let max_fraction = clamp_fraction(max_fraction);

        self.heights.clear();
        self.heights.resize(width, baseline);
        self.baseline = baseline;
        self.surface_ceiling = baseline - baseline * max_fraction;

        log::debug!(
            "height field resized to {width} columns, baseline {baseline}, ceiling {}",
            self.surface_ceiling
        );
    }

    /// Record a flake landing at `column`.
    ///
    /// The surface rises in a wide shallow bump: the target height of each
    /// column in reach is capped by the mean of the nearby columns, so one
    /// landing spot can never grow a spike. Out-of-range columns clamp to
    /// the nearest edge.
    pub fn deposit(&mut self, column: i64) {
        let len = self.heights.len() as i64;
        if len == 0 {
            return;
        }
        let column = column.clamp(0, len - 1);

        let half = DEPOSIT_RANGE / 2;
        let near_start = (column - half).max(0) as usize;
        let near_end = (column + half).min(len) as usize;
        let nearby = &self.heights[near_start..near_end];
        let average = nearby.iter().sum::<f32>() / nearby.len() as f32;

        let start = (column - DEPOSIT_RANGE).max(0);
        let end = (column + DEPOSIT_RANGE).min(len);
        for i in start..end {
            let distance = (i - column).abs() as f32;
            let decrease = DEPOSIT_AMOUNT * (1.0 - distance / DEPOSIT_RANGE as f32);
            let slot = &mut self.heights[i as usize];
            let target = (average - decrease).min(*slot - decrease);
            *slot = target.max(self.surface_ceiling);
        }
    }

    /// Surface height under a horizontal position, for collision tests.
    ///
    /// Positions outside the field report the baseline.
    pub fn height_at(&self, x: f32) -> f32 {
        if !x.is_finite() || x < 0.0 {
            return self.baseline;
        }
        self.heights
            .get(x.floor() as usize)
            .copied()
            .unwrap_or(self.baseline)
    }

    /// Render-only copy of the surface with a single 3-tap smoothing pass.
    ///
    /// End columns are copied unchanged.
    pub fn snapshot_smoothed(&self) -> Vec<f32> {
        let mut smoothed = self.heights.clone();
        for (i, window) in self.heights.windows(3).enumerate() {
            smoothed[i + 1] = (window[0] + window[1] + window[2]) / 3.0;
        }
        smoothed
    }

    /// Raw settle heights.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    pub fn surface_ceiling(&self) -> f32 {
        self.surface_ceiling
    }

    pub fn width(&self) -> usize {
        self.heights.len()
    }

    /// Whether [`resize`](Self::resize) has been called.
    pub fn is_sized(&self) -> bool {
        !self.heights.is_empty()
    }

    /// Flatten the pile back to the baseline without changing the size.
    pub fn clear(&mut self) {
        self.heights.fill(self.baseline);
    }
}

fn clamp_fraction(fraction: f32) -> f32 {
    if fraction.is_finite() && fraction > 0.0 {
        fraction.min(1.0)
    } else {
        DEFAULT_MAX_FRACTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(width: u32, height: u32) -> HeightFieldAccumulator {
        let mut field = HeightFieldAccumulator::new();
        field.resize(width, height, 0.3);
        field
    }

    #[test]
    fn test_resize_is_flat_at_baseline() {
        let f = field(300, 100);
        assert_eq!(f.width(), 300);
        assert!(f.heights().iter().all(|&h| h == 100.0));
        assert!((f.surface_ceiling() - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_resize_floors_dimensions() {
        let mut f = HeightFieldAccumulator::new();
        assert!(!f.is_sized());
        f.resize(0, 0, 0.3);
        assert_eq!(f.width(), 1);
        assert_eq!(f.baseline(), 1.0);
    }

    #[test]
    fn test_resize_clamps_fraction() {
        let mut f = HeightFieldAccumulator::new();
        f.resize(10, 100, 5.0);
        assert_eq!(f.surface_ceiling(), 0.0);
        f.resize(10, 100, -1.0);
        assert!((f.surface_ceiling() - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_deposit_small_field() {
        let mut f = field(10, 100);
        f.deposit(5);
        assert!((f.heights()[5] - 97.5).abs() < 1e-4);
        for i in 0..5 {
            assert!(f.heights()[i] >= f.heights()[i + 1] - 1e-4);
        }
        for i in 5..9 {
            assert!(f.heights()[i] <= f.heights()[i + 1] + 1e-4);
        }
    }

    #[test]
    fn test_deposit_falloff_shape() {
        let mut f = field(300, 100);
        f.deposit(150);
        let h = f.heights();
        assert!((h[150] - 97.5).abs() < 1e-4);
        assert_eq!(h[50], 100.0);
        assert_eq!(h[250], 100.0);
        assert!((h[100] - 98.75).abs() < 1e-4);
        for d in 0..99 {
            assert!(h[150 + d] <= h[150 + d + 1]);
            assert!(h[150 - d] <= h[150 - d - 1]);
        }
    }

    #[test]
    fn test_deposit_never_raises_surface() {
        let mut f = field(300, 100);
        let columns = [10, 150, 151, 299, 0, 75, 150, 150, 220];
        for &c in columns.iter().cycle().take(200) {
            let before = f.heights().to_vec();
            f.deposit(c);
            for (after, before) in f.heights().iter().zip(&before) {
                assert!(after <= before);
            }
        }
    }

    #[test]
    fn test_deposit_respects_ceiling() {
        let mut f = field(300, 100);
        for _ in 0..500 {
            f.deposit(150);
        }
        let ceiling = f.surface_ceiling();
        assert!(f.heights().iter().all(|&h| h >= ceiling && h <= 100.0));
        assert_eq!(f.heights()[150], ceiling);
    }

    #[test]
    fn test_deposit_clamps_column() {
        let mut f = field(300, 100);
        f.deposit(-40);
        assert!((f.heights()[0] - 97.5).abs() < 1e-4);
        f.deposit(10_000);
        assert!((f.heights()[299] - 97.5).abs() < 1e-4);
    }

    #[test]
    fn test_deposit_on_unsized_field_is_noop() {
        let mut f = HeightFieldAccumulator::new();
        f.deposit(3);
        assert!(f.heights().is_empty());
    }

    #[test]
    fn test_height_at() {
        let mut f = field(300, 100);
        f.deposit(20);
        assert_eq!(f.height_at(20.9), f.heights()[20]);
        assert_eq!(f.height_at(-0.5), 100.0);
        assert_eq!(f.height_at(300.0), 100.0);
        assert_eq!(f.height_at(f32::NAN), 100.0);
    }

    #[test]
    fn test_snapshot_smoothed() {
        let mut f = field(5, 100);
        f.heights[2] = 97.0;
        let smoothed = f.snapshot_smoothed();
        assert_eq!(smoothed[0], 100.0);
        assert_eq!(smoothed[4], 100.0);
        assert!((smoothed[1] - 99.0).abs() < 1e-4);
        assert!((smoothed[2] - 99.0).abs() < 1e-4);
        assert!((smoothed[3] - 99.0).abs() < 1e-4);
        assert_eq!(f.heights()[2], 97.0);
    }

    #[test]
    fn test_clear() {
        let mut f = field(50, 100);
        f.deposit(25);
        f.clear();
        assert!(f.heights().iter().all(|&h| h == 100.0));
    }
}
