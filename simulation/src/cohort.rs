//! Cohort Simulator - runs a fixed population against one onset distribution

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::trace;

use crate::components::{PatientHistory, PatientId};
use crate::config::{validate_cdf, SimulationConfig};
use crate::error::{CalibrationError, Result};
use crate::patient::Patient;
use crate::systems::{incidence_rates, AgeCounts, RiskTables};

pub struct CohortSimulator {
    config: SimulationConfig,
    mortality_cdf: Vec<f64>,
    patients: Vec<Patient>,
    log: Vec<PatientHistory>,
    counts: AgeCounts,
    incidence_rate: Vec<f64>,
}

impl CohortSimulator {
    /// Create the cohort once; patients are reused across runs.
    pub fn new(config: SimulationConfig, mortality_cdf: Vec<f64>) -> Result<Self> {
        config.validate()?;
        let span = config.age_span();
        validate_cdf("mortality_cdf", &mortality_cdf, span)?;

        let patients = (0..config.num_patients)
            .map(|pid| Patient::new(PatientId(pid as u64), config.start_age))
            .collect();

        Ok(Self {
            mortality_cdf,
            patients,
            log: Vec::with_capacity(config.num_patients),
            counts: AgeCounts::zeroed(span),
            incidence_rate: vec![0.0; span],
            config,
        })
    }

    /// Simulate every patient against `onset_pdf` and rebuild the incidence curve.
    pub fn run<R: Rng + ?Sized>(&mut self, onset_pdf: &[f64], rng: &mut R) -> Result<&Self> {
        let span = self.config.age_span();
        if onset_pdf.len() != span {
            return Err(CalibrationError::LengthMismatch {
                name: "cancer_pdf",
                expected: span,
                actual: onset_pdf.len(),
            });
        }

        self.reset();
        let risks = RiskTables::new(&self.mortality_cdf, onset_pdf);

        if self.config.parallel {
            // Seeds are drawn in cohort order so a seeded run stays reproducible
            let seeds: Vec<u64> = (0..self.patients.len()).map(|_| rng.gen()).collect();
            self.log = self
                .patients
                .par_iter_mut()
                .zip(seeds.par_iter())
                .map(|(patient, &seed)| {
                    let mut patient_rng = StdRng::seed_from_u64(seed);
                    patient.run(&risks, &mut patient_rng)
                })
                .collect();
        } else {
            for patient in self.patients.iter_mut() {
                let history = patient.run(&risks, rng);
                self.log.push(history);
            }
        }

        let start_age = self.config.start_age;
        for history in &self.log {
            self.counts.record(history, start_age);
        }
        self.incidence_rate = incidence_rates(&self.counts, self.patients.len());

        trace!(
            "Cohort run: {} patients, {} cancer cases",
            self.patients.len(),
            self.counts.incidence.iter().sum::<u64>()
        );

        Ok(self)
    }

    /// Clear the log and zero all per-age arrays.
    pub fn reset(&mut self) {
        self.log.clear();
        self.counts.clear();
        self.incidence_rate.iter_mut().for_each(|r| *r = 0.0);
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn population(&self) -> usize {
        self.patients.len()
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Histories from the last run, in cohort order.
    pub fn log(&self) -> &[PatientHistory] {
        &self.log
    }

    pub fn mortality_counts(&self) -> &[u64] {
        &self.counts.mortality
    }

    pub fn incidence_counts(&self) -> &[u64] {
        &self.counts.incidence
    }

    /// Incidence per 100,000 at risk, by age offset.
    pub fn incidence_rate(&self) -> &[f64] {
        &self.incidence_rate
    }
}
