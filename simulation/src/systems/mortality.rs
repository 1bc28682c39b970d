//! Mortality and Onset Sampling
//!
//! Inverse-CDF sampling of event ages from cumulative tables indexed by age offset.

use rand::Rng;

/// Running total of a density table.
pub fn cumulative_sum(pdf: &[f64]) -> Vec<f64> {
    pdf.iter()
        .scan(0.0, |total, &p| {
            *total += p;
            Some(*total)
        })
        .collect()
}

/// Index of the first bin whose cumulative value is `>= u`.
///
/// Returns `cdf.len()` when every bin is below `u`.
pub fn insertion_point(cdf: &[f64], u: f64) -> usize {
    cdf.partition_point(|&value| value < u)
}

/// Draw an age offset from a cumulative table.
///
/// `None` when the draw falls past the last bin.
pub fn sample_offset<R: Rng + ?Sized>(cdf: &[f64], rng: &mut R) -> Option<usize> {
    let offset = insertion_point(cdf, rng.gen::<f64>());
    (offset < cdf.len()).then_some(offset)
}

/// Competing-risk tables for one cohort run.
#[derive(Debug, Clone)]
pub struct RiskTables<'a> {
    pub mortality_cdf: &'a [f64],
    pub onset_cdf: Vec<f64>,
}

impl<'a> RiskTables<'a> {
    pub fn new(mortality_cdf: &'a [f64], onset_pdf: &[f64]) -> Self {
        Self {
            mortality_cdf,
            onset_cdf: cumulative_sum(onset_pdf),
        }
    }

    /// Death offset; draws past the table end die in the last age bin.
    pub fn sample_death<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let last = self.mortality_cdf.len().saturating_sub(1);
        sample_offset(self.mortality_cdf, rng).unwrap_or(last)
    }

    /// Cancer-onset offset, if onset falls within the table.
    pub fn sample_onset<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        sample_offset(&self.onset_cdf, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cumulative_sum() {
        assert_eq!(cumulative_sum(&[0.25, 0.25, 0.5]), vec![0.25, 0.5, 1.0]);
        assert!(cumulative_sum(&[]).is_empty());
    }

    #[test]
    fn test_insertion_point_is_left_biased() {
        let cdf = [0.2, 0.5, 0.5, 1.0];
        assert_eq!(insertion_point(&cdf, 0.0), 0);
        assert_eq!(insertion_point(&cdf, 0.2), 0);
        assert_eq!(insertion_point(&cdf, 0.3), 1);
        assert_eq!(insertion_point(&cdf, 0.5), 1);
        assert_eq!(insertion_point(&cdf, 0.7), 3);
    }

    #[test]
    fn test_insertion_point_past_end() {
        assert_eq!(insertion_point(&[0.0, 0.0], 0.5), 2);
    }

    #[test]
    fn test_zero_density_never_onsets() {
        let mut rng = StdRng::seed_from_u64(7);
        let tables = RiskTables::new(&[1.0, 1.0], &[0.0, 0.0]);
        for _ in 0..100 {
            assert_eq!(tables.sample_onset(&mut rng), None);
        }
    }

    #[test]
    fn test_short_mortality_table_clamps_to_last_bin() {
        let mut rng = StdRng::seed_from_u64(7);
        let tables = RiskTables::new(&[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0]);
        assert_eq!(tables.sample_death(&mut rng), 2);
    }
}
