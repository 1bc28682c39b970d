//! Simulated patient
//!
//! Each run samples an all-cause death age and a competing cancer-onset age.

use rand::Rng;
use std::fmt;

use crate::components::{PatientHistory, PatientId, PatientState};
use crate::systems::RiskTables;

#[derive(Debug, Clone)]
pub struct Patient {
    pub id: PatientId,
    /// Age at entry to the simulation.
    pub age: u32,
    history: Option<PatientHistory>,
}

impl Patient {
    pub fn new(id: PatientId, age: u32) -> Self {
        Self {
            id,
            age,
            history: None,
        }
    }

    /// Run one life. Onset is recorded only if it happens no later than death.
    pub fn run<R: Rng + ?Sized>(&mut self, risks: &RiskTables<'_>, rng: &mut R) -> PatientHistory {
        self.reset();

        let death_age = self.age + risks.sample_death(rng) as u32;
        let cancer_onset_age = risks
            .sample_onset(rng)
            .map(|offset| self.age + offset as u32)
            .filter(|&onset| onset <= death_age);

        let history = PatientHistory {
            healthy_age: self.age,
            cancer_onset_age,
            death_age,
        };
        self.history = Some(history);
        history
    }

    /// Forget the last run; only the healthy entry state remains.
    pub fn reset(&mut self) {
        self.history = None;
    }

    pub fn history(&self) -> Option<&PatientHistory> {
        self.history.as_ref()
    }

    /// States entered so far, with entry ages.
    pub fn states(&self) -> Vec<(PatientState, u32)> {
        match &self.history {
            Some(history) => history.states().collect(),
            None => vec![(PatientState::Healthy, self.age)],
        }
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.history {
            Some(history) => write!(f, "Patient:{}, history:{}", self.id, history),
            None => write!(f, "Patient:{}, history:{{Healthy: {}}}", self.id, self.age),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_immediate_death_without_cancer() {
        let mut rng = StdRng::seed_from_u64(1);
        let risks = RiskTables::new(&[1.0, 1.0], &[0.0, 0.0]);
        let mut patient = Patient::new(PatientId(0), 30);

        let history = patient.run(&risks, &mut rng);
        assert_eq!(history.death_age, 30);
        assert_eq!(history.cancer_onset_age, None);
        assert_eq!(
            patient.states(),
            vec![(PatientState::Healthy, 30), (PatientState::OtherDeath, 30)]
        );
    }

    #[test]
    fn test_onset_at_death_age_counts_as_cancer() {
        let mut rng = StdRng::seed_from_u64(2);
        // Everyone dies and gets cancer in the first bin
        let risks = RiskTables::new(&[1.0, 1.0], &[1.0, 0.0]);
        let mut patient = Patient::new(PatientId(3), 0);

        let history = patient.run(&risks, &mut rng);
        assert_eq!(history.cancer_onset_age, Some(0));
        assert_eq!(history.death_age, 0);
    }

    #[test]
    fn test_onset_after_death_is_censored() {
        let mut rng = StdRng::seed_from_u64(3);
        let risks = RiskTables::new(&[1.0, 1.0, 1.0], &[0.0, 0.0, 1.0]);
        let mut patient = Patient::new(PatientId(0), 0);

        for _ in 0..20 {
            let history = patient.run(&risks, &mut rng);
            assert!(!history.has_cancer());
        }
    }

    #[test]
    fn test_reset_clears_history() {
        let mut rng = StdRng::seed_from_u64(4);
        let risks = RiskTables::new(&[1.0], &[1.0]);
        let mut patient = Patient::new(PatientId(9), 65);
        patient.run(&risks, &mut rng);
        assert!(patient.history().is_some());

        patient.reset();
        assert!(patient.history().is_none());
        assert_eq!(patient.states(), vec![(PatientState::Healthy, 65)]);
        assert_eq!(patient.to_string(), "Patient:9, history:{Healthy: 65}");
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let cdf = [0.1, 0.3, 0.6, 0.8, 1.0];
        let pdf = [0.05, 0.1, 0.1, 0.2, 0.1];
        let risks = RiskTables::new(&cdf, &pdf);
        let mut a = Patient::new(PatientId(0), 10);
        let mut b = Patient::new(PatientId(0), 10);
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);

        for _ in 0..50 {
            assert_eq!(a.run(&risks, &mut rng_a), b.run(&risks, &mut rng_b));
        }
    }
}
