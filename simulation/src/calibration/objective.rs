//! Discrepancy between a simulated incidence curve and observed data

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::{CalibrationError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    #[default]
    MeanSquaredError,
    SumSquaredError,
}

impl Loss {
    fn apply(&self, simulated: &[f64], observed: &[f64]) -> f64 {
        let sse: f64 = simulated
            .iter()
            .zip(observed)
            .map(|(s, o)| (o - s).powi(2))
            .sum();
        match self {
            Loss::MeanSquaredError => sse / observed.len() as f64,
            Loss::SumSquaredError => sse,
        }
    }
}

/// Score `simulated[window]` against `observed`. Lower is better.
pub fn objective(
    simulated: &[f64],
    observed: &[f64],
    window: Range<usize>,
    loss: Loss,
) -> Result<f64> {
    if window.is_empty() || window.end > simulated.len() {
        return Err(CalibrationError::LengthMismatch {
            name: "incidence_rate",
            expected: window.end,
            actual: simulated.len(),
        });
    }
    let slice = &simulated[window];
    if slice.len() != observed.len() {
        return Err(CalibrationError::LengthMismatch {
            name: "cancer_incidence",
            expected: slice.len(),
            actual: observed.len(),
        });
    }
    Ok(loss.apply(slice, observed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_curves_score_zero() {
        let curve = [3.0, 5.0, 8.0, 13.0];
        assert_eq!(
            objective(&curve, &curve, 0..4, Loss::MeanSquaredError).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_mean_squared_error_over_window() {
        let simulated = [100.0, 1.0, 2.0, 3.0, 100.0];
        let observed = [2.0, 2.0, 5.0];
        // squared errors 1, 0, 4
        let mse = objective(&simulated, &observed, 1..4, Loss::MeanSquaredError).unwrap();
        assert!((mse - 5.0 / 3.0).abs() < 1e-12);
        let sse = objective(&simulated, &observed, 1..4, Loss::SumSquaredError).unwrap();
        assert!((sse - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_mismatch_fails() {
        let simulated = [1.0, 2.0, 3.0];
        assert!(objective(&simulated, &[1.0], 0..2, Loss::MeanSquaredError).is_err());
        assert!(objective(&simulated, &[1.0, 2.0], 2..4, Loss::MeanSquaredError).is_err());
    }
}
