//! Isotonic probability calibration.
//!
//! Raw ELO win probabilities are mapped through a non-decreasing step
//! function fitted offline (pool-adjacent-violators) on historical
//! (predicted, observed) pairs. The fitted map is stored as breakpoints
//! and versioned; a version mismatch at load time is fatal.

use serde::{Deserialize, Serialize};

/// Schema version of the calibration artifact.
pub const CURRENT_CALIBRATION_VERSION: u32 = 1;

/// Calibration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CalibrationError {
    #[error("Calibration artifact version {found} does not match expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Calibration map is empty")]
    Empty,

    #[error("Calibration breakpoint {index} out of range or non-monotone")]
    NonMonotone { index: usize },
}

/// A non-decreasing step function `C: [0,1] -> [0,1]` stored as `(x, y)`
/// breakpoints sorted by `x`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationMap {
    pub version: u32,
    pub points: Vec<(f64, f64)>,
}

impl CalibrationMap {
    /// The identity map: calibrated probability equals the raw one.
    pub fn identity() -> Self {
        Self {
            version: CURRENT_CALIBRATION_VERSION,
            points: vec![(0.0, 0.0), (1.0, 1.0)],
        }
    }

    /// Fit by pool-adjacent-violators on `(raw probability, outcome)` pairs,
    /// outcome in {0, 1}. Produces one breakpoint per fitted block.
    pub fn fit(samples: &[(f64, f64)]) -> Result<Self, CalibrationError> {
        if samples.is_empty() {
            return Err(CalibrationError::Empty);
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        // Each block carries (sum of x, sum of y, count); adjacent blocks
        // whose means violate monotonicity are pooled.
        let mut blocks: Vec<(f64, f64, usize)> = Vec::with_capacity(sorted.len());
        for &(x, y) in &sorted {
            blocks.push((x, y, 1));
            while blocks.len() >= 2 {
                let (x2, y2, n2) = blocks[blocks.len() - 1];
                let (x1, y1, n1) = blocks[blocks.len() - 2];
                if y1 / n1 as f64 <= y2 / n2 as f64 {
                    break;
                }
                blocks.truncate(blocks.len() - 2);
                blocks.push((x1 + x2, y1 + y2, n1 + n2));
            }
        }

        let points = blocks
            .into_iter()
            .map(|(x, y, n)| (x / n as f64, (y / n as f64).clamp(0.0, 1.0)))
            .collect();

        Ok(Self {
            version: CURRENT_CALIBRATION_VERSION,
            points,
        })
    }

    /// Evaluate the fitted map: linear interpolation between breakpoints,
    /// held flat outside their range, clamped to [0,1]. Interpolation keeps
    /// the identity map an exact no-op.
    pub fn apply(&self, p: f64) -> f64 {
        let p = p.clamp(0.0, 1.0);
        let Some(&(first_x, first_y)) = self.points.first() else {
            return p;
        };
        if p <= first_x {
            return first_y.clamp(0.0, 1.0);
        }
        for window in self.points.windows(2) {
            let (x1, y1) = window[0];
            let (x2, y2) = window[1];
            if p <= x2 {
                let value = if x2 == x1 {
                    y2
                } else {
                    y1 + (p - x1) / (x2 - x1) * (y2 - y1)
                };
                return value.clamp(0.0, 1.0);
            }
        }
        let (_, last_y) = self.points[self.points.len() - 1];
        last_y.clamp(0.0, 1.0)
    }

    /// Calibrated probability for the away side.
    pub fn apply_away(&self, home_p: f64) -> f64 {
        1.0 - self.apply(home_p)
    }

    /// Check version and monotonicity. Run after loading the artifact.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.version != CURRENT_CALIBRATION_VERSION {
            return Err(CalibrationError::VersionMismatch {
                found: self.version,
                expected: CURRENT_CALIBRATION_VERSION,
            });
        }
        if self.points.is_empty() {
            return Err(CalibrationError::Empty);
        }
        for (i, window) in self.points.windows(2).enumerate() {
            let (x1, y1) = window[0];
            let (x2, y2) = window[1];
            if x2 < x1 || y2 < y1 {
                return Err(CalibrationError::NonMonotone { index: i + 1 });
            }
        }
        for (i, &(x, y)) in self.points.iter().enumerate() {
            if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
                return Err(CalibrationError::NonMonotone { index: i });
            }
        }
        Ok(())
    }
}
