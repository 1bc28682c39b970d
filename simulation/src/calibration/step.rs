//! Neighbor generation for the annealing search

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use super::smoothing::SavgolFilter;
use crate::error::Result;

/// Perturb a random subset of `candidate`, smooth it, and clip to [0, 1].
///
/// Each entry is perturbed when its uniform draw exceeds `mask_size`, by a
/// uniform amount in `[-step_size, step_size)`. All mask draws happen before
/// any perturbation draw.
pub fn step<R: Rng + ?Sized>(
    mut candidate: Vec<f64>,
    step_size: f64,
    mask_size: f64,
    filter: &SavgolFilter,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let mask: Vec<bool> = (0..candidate.len())
        .map(|_| rng.gen::<f64>() > mask_size)
        .collect();

    if step_size > 0.0 {
        let noise = Uniform::new(-step_size, step_size);
        for (value, _) in candidate.iter_mut().zip(&mask).filter(|(_, selected)| **selected) {
            *value += noise.sample(rng);
        }
    }

    let smoothed = filter.apply(&candidate)?;
    Ok(smoothed.into_iter().map(|v| v.clamp(0.0, 1.0)).collect())
}
