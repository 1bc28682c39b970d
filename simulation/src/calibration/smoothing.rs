//! Savitzky-Golay smoothing with polynomial-interpolated edges
//!
//! Every output is a least-squares polynomial fit evaluated at one position of
//! a `window_length` slice of the input. Interior outputs use the window
//! starting `(window_length - 1) / 2` samples back and evaluate at its centre,
//! so an even window lands half a sample to the right. The first and last
//! `window_length / 2` outputs evaluate a single fit over the first or last
//! window instead of padding the input.

use nalgebra::DMatrix;

use crate::error::{CalibrationError, Result};

#[derive(Debug, Clone)]
pub struct SavgolFilter {
    window_length: usize,
    polyorder: usize,
    interior: Vec<f64>,
    leading: Vec<Vec<f64>>,
    trailing: Vec<Vec<f64>>,
}

impl SavgolFilter {
    pub fn new(window_length: usize, polyorder: usize) -> Result<Self> {
        if window_length == 0 || polyorder >= window_length {
            return Err(CalibrationError::Smoothing(format!(
                "polyorder {} must be less than window length {}",
                polyorder, window_length
            )));
        }

        let half = window_length / 2;
        let centre = (window_length - 1) as f64 / 2.0;
        let interior = fit_weights(window_length, polyorder, centre)?;
        let leading = (0..half)
            .map(|pos| fit_weights(window_length, polyorder, pos as f64))
            .collect::<Result<Vec<_>>>()?;
        let trailing = (window_length - half..window_length)
            .map(|pos| fit_weights(window_length, polyorder, pos as f64))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            window_length,
            polyorder,
            interior,
            leading,
            trailing,
        })
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    pub fn polyorder(&self) -> usize {
        self.polyorder
    }

    pub fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        let n = data.len();
        let w = self.window_length;
        if n < w {
            return Err(CalibrationError::Smoothing(format!(
                "window length {} exceeds input length {}",
                w, n
            )));
        }

        let half = w / 2;
        let back = (w - 1) / 2;
        let mut out = vec![0.0; n];

        for i in half..n - half {
            out[i] = dot(&self.interior, &data[i - back..i - back + w]);
        }
        for (i, weights) in self.leading.iter().enumerate() {
            out[i] = dot(weights, &data[..w]);
        }
        for (j, weights) in self.trailing.iter().enumerate() {
            out[n - half + j] = dot(weights, &data[n - w..]);
        }

        Ok(out)
    }
}

/// Weights that map `window_length` samples to the value at `pos` of their
/// least-squares polynomial of degree `polyorder`.
fn fit_weights(window_length: usize, polyorder: usize, pos: f64) -> Result<Vec<f64>> {
    // Positions are centred on `pos`, so the constant term is the fitted value there
    let vandermonde = DMatrix::from_fn(window_length, polyorder + 1, |row, col| {
        (row as f64 - pos).powi(col as i32)
    });
    let normal = vandermonde.tr_mul(&vandermonde);
    let inverse = normal.try_inverse().ok_or_else(|| {
        CalibrationError::Smoothing("singular polynomial fit".to_string())
    })?;
    let projection = inverse * vandermonde.transpose();
    Ok(projection.row(0).iter().copied().collect())
}

fn dot(weights: &[f64], samples: &[f64]) -> f64 {
    weights.iter().zip(samples).map(|(w, s)| w * s).sum()
}
