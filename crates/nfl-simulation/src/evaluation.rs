//! Prediction quality metrics: Brier score, log loss, accuracy, and
//! per-bin calibration error.

use serde::{Deserialize, Serialize};

/// Clamp bound for log loss.
const LOG_LOSS_EPSILON: f64 = 1e-15;

/// Width of each calibration bin.
const BIN_WIDTH: f64 = 0.05;

/// Number of calibration bins on [0, 1].
const BIN_COUNT: usize = 20;

/// A prediction paired with the observed result. `actual` is from the
/// home side's perspective: 1 home win, 0 home loss, 0.5 tie.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PredictionSample {
    pub predicted: f64,
    pub actual: f64,
}

impl PredictionSample {
    pub fn new(predicted: f64, actual: f64) -> Self {
        Self { predicted, actual }
    }
}

/// One calibration bin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CalibrationBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    pub mean_predicted: f64,
    pub mean_observed: f64,
    pub abs_error: f64,
}

/// Full evaluation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Samples evaluated.
    pub n: usize,
    /// Mean squared error of the probability forecast.
    pub brier_score: f64,
    /// Clamped negative log likelihood.
    pub log_loss: f64,
    /// Fraction of non-tie games where `round(p)` matched the result.
    pub accuracy: f64,
    /// Non-tie games counted toward accuracy.
    pub accuracy_n: usize,
    pub bins: Vec<CalibrationBin>,
}

/// Evaluate predictions against observed outcomes. Empty input produces a
/// zeroed report with empty bins.
pub fn evaluate(samples: &[PredictionSample]) -> EvaluationReport {
    let n = samples.len();

    let mut brier_sum = 0.0;
    let mut log_loss_sum = 0.0;
    let mut correct = 0usize;
    let mut accuracy_n = 0usize;

    // (count, predicted sum, observed sum) per bin.
    let mut bin_accum = [(0usize, 0.0f64, 0.0f64); BIN_COUNT];

    for sample in samples {
        let p = sample.predicted.clamp(0.0, 1.0);
        let actual = sample.actual;

        brier_sum += (p - actual) * (p - actual);

        let clamped = p.clamp(LOG_LOSS_EPSILON, 1.0 - LOG_LOSS_EPSILON);
        log_loss_sum -= actual * clamped.ln() + (1.0 - actual) * (1.0 - clamped).ln();

        // Ties are excluded from accuracy.
        if actual != 0.5 {
            accuracy_n += 1;
            if p.round() == actual {
                correct += 1;
            }
        }

        let bin = ((p / BIN_WIDTH) as usize).min(BIN_COUNT - 1);
        bin_accum[bin].0 += 1;
        bin_accum[bin].1 += p;
        bin_accum[bin].2 += actual;
    }

    let bins = bin_accum
        .iter()
        .enumerate()
        .map(|(i, &(count, pred_sum, obs_sum))| {
            let (mean_predicted, mean_observed) = if count > 0 {
                (pred_sum / count as f64, obs_sum / count as f64)
            } else {
                (0.0, 0.0)
            };
            CalibrationBin {
                lower: i as f64 * BIN_WIDTH,
                upper: (i + 1) as f64 * BIN_WIDTH,
                count,
                mean_predicted,
                mean_observed,
                abs_error: (mean_predicted - mean_observed).abs(),
            }
        })
        .collect();

    EvaluationReport {
        n,
        brier_score: if n > 0 { brier_sum / n as f64 } else { 0.0 },
        log_loss: if n > 0 { log_loss_sum / n as f64 } else { 0.0 },
        accuracy: if accuracy_n > 0 {
            correct as f64 / accuracy_n as f64
        } else {
            0.0
        },
        accuracy_n,
        bins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let samples = vec![
            PredictionSample::new(1.0, 1.0),
            PredictionSample::new(0.0, 0.0),
        ];
        let report = evaluate(&samples);
        assert_eq!(report.brier_score, 0.0);
        assert!(report.log_loss < 1e-10);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.accuracy_n, 2);
    }

    #[test]
    fn test_coin_flip_brier() {
        // Always predicting 0.5 gives Brier 0.25 on decisive games.
        let samples = vec![
            PredictionSample::new(0.5, 1.0),
            PredictionSample::new(0.5, 0.0),
        ];
        let report = evaluate(&samples);
        assert!((report.brier_score - 0.25).abs() < 1e-12);
        assert!((report.log_loss - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn test_log_loss_clamped_on_confident_miss() {
        // A certain prediction that misses is clamped, not infinite.
        let report = evaluate(&[PredictionSample::new(1.0, 0.0)]);
        assert!(report.log_loss.is_finite());
        assert!(report.log_loss > 30.0);
    }

    #[test]
    fn test_ties_excluded_from_accuracy() {
        let samples = vec![
            PredictionSample::new(0.8, 1.0),
            PredictionSample::new(0.7, 0.5),
        ];
        let report = evaluate(&samples);
        assert_eq!(report.accuracy_n, 1);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.n, 2);
    }

    #[test]
    fn test_bin_layout() {
        let report = evaluate(&[]);
        assert_eq!(report.bins.len(), 20);
        assert_eq!(report.bins[0].lower, 0.0);
        assert!((report.bins[0].upper - 0.05).abs() < 1e-12);
        assert!((report.bins[19].lower - 0.95).abs() < 1e-12);
        assert_eq!(report.bins[19].upper, 1.0);
        assert_eq!(report.n, 0);
        assert_eq!(report.brier_score, 0.0);
    }

    #[test]
    fn test_bin_assignment_and_error() {
        let samples = vec![
            PredictionSample::new(0.62, 1.0),
            PredictionSample::new(0.64, 0.0),
            // Boundary case: 1.0 lands in the last bin.
            PredictionSample::new(1.0, 1.0),
        ];
        let report = evaluate(&samples);
        let bin12 = &report.bins[12]; // [0.60, 0.65)
        assert_eq!(bin12.count, 2);
        assert!((bin12.mean_predicted - 0.63).abs() < 1e-12);
        assert!((bin12.mean_observed - 0.5).abs() < 1e-12);
        assert!((bin12.abs_error - 0.13).abs() < 1e-12);
        assert_eq!(report.bins[19].count, 1);
    }

    #[test]
    fn test_well_calibrated_bins_have_small_error() {
        // Synthetic data matching its own predictions: out of ten games at
        // 0.7, seven are won.
        let mut samples = Vec::new();
        for i in 0..10 {
            samples.push(PredictionSample::new(0.7, if i < 7 { 1.0 } else { 0.0 }));
        }
        let report = evaluate(&samples);
        let bin14 = &report.bins[14]; // [0.70, 0.75)
        assert_eq!(bin14.count, 10);
        assert!(bin14.abs_error < 1e-12);
    }
}
