//! Persistence module for calibration reports
//!
//! Serializes the outcome of a calibration run to JSON and restores it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::calibration::CalibrationOutcome;
use crate::cohort::CohortSimulator;
use crate::error::{CalibrationError, Result};

/// Current report schema version.
pub const REPORT_VERSION: u8 = 1;

/// Calibrated distribution and the cohort curves it produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub version: u8, // Schema version for forward compatibility
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub start_age: u32,
    pub end_age: u32,
    pub num_patients: usize,
    pub iterations: usize,
    pub accepted_moves: usize,
    pub initial_score: f64,
    pub best_score: f64,
    pub best_pdf: Vec<f64>,
    /// Incidence per 100,000 from one run of `best_pdf`.
    pub incidence_rate: Vec<f64>,
    pub mortality_counts: Vec<u64>,
}

impl CalibrationReport {
    /// Build a report from an outcome and a simulator that last ran the best density.
    pub fn new(outcome: &CalibrationOutcome, simulator: &CohortSimulator, seed: u64) -> Self {
        let config = simulator.config();
        Self {
            version: REPORT_VERSION,
            generated_at: Utc::now(),
            seed,
            start_age: config.start_age,
            end_age: config.end_age,
            num_patients: simulator.population(),
            iterations: outcome.iterations,
            accepted_moves: outcome.accepted_moves,
            initial_score: outcome.initial_score,
            best_score: outcome.best_score,
            best_pdf: outcome.best.clone(),
            incidence_rate: simulator.incidence_rate().to_vec(),
            mortality_counts: simulator.mortality_counts().to_vec(),
        }
    }

    pub fn export(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn import(json: &str) -> Result<Self> {
        let report: CalibrationReport = serde_json::from_str(json)?;

        // Validate version
        if report.version != REPORT_VERSION {
            return Err(CalibrationError::UnsupportedVersion(report.version));
        }
        Ok(report)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<u64> {
        let json = self.export()?;
        std::fs::write(path, &json)?;
        Ok(json.len() as u64)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::import(&json)
    }
}
