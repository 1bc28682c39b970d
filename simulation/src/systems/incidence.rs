//! Incidence System
//!
//! Aggregates patient histories into per-age mortality counts and
//! per-100,000 incidence rates.

use crate::components::PatientHistory;

/// Incidence rates are reported per this many people at risk.
pub const RATE_SCALE: f64 = 100_000.0;

/// Raw per-age event counts for one cohort run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgeCounts {
    pub mortality: Vec<u64>,
    pub incidence: Vec<u64>,
}

impl AgeCounts {
    pub fn zeroed(span: usize) -> Self {
        Self {
            mortality: vec![0; span],
            incidence: vec![0; span],
        }
    }

    /// Record one history. Patients without onset only add a death.
    pub fn record(&mut self, history: &PatientHistory, start_age: u32) {
        self.mortality[(history.death_age - start_age) as usize] += 1;
        if let Some(onset) = history.cancer_onset_age {
            self.incidence[(onset - start_age) as usize] += 1;
        }
    }

    pub fn clear(&mut self) {
        self.mortality.iter_mut().for_each(|c| *c = 0);
        self.incidence.iter_mut().for_each(|c| *c = 0);
    }
}

/// Number still at risk in each age bin: the population minus every death
/// at or before that bin.
pub fn alive_at_age(mortality: &[u64], population: usize) -> Vec<f64> {
    let mut deaths = 0u64;
    mortality
        .iter()
        .map(|&count| {
            deaths += count;
            population as f64 - deaths as f64
        })
        .collect()
}

/// `RATE_SCALE * incidence / (alive + 1)` elementwise.
pub fn incidence_rates(counts: &AgeCounts, population: usize) -> Vec<f64> {
    alive_at_age(&counts.mortality, population)
        .into_iter()
        .zip(&counts.incidence)
        .map(|(alive, &cases)| RATE_SCALE * cases as f64 / (alive + 1.0))
        .collect()
}
