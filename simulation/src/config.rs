//! Calibration configuration
//!
//! Age bounds, input tables and annealing hyperparameters are bundled into one
//! immutable structure that is validated before any simulation starts.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

use crate::calibration::Loss;
use crate::error::{CalibrationError, Result};

/// First and last (exclusive) calendar years covered by observed incidence data.
const DEFAULT_OBSERVED_YEARS: ObservedYears = ObservedYears {
    start: 1975,
    end: 2021,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedYears {
    pub start: i32,
    pub end: i32,
}

impl Default for ObservedYears {
    fn default() -> Self {
        DEFAULT_OBSERVED_YEARS
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub start_age: u32,
    pub end_age: u32,
    pub num_patients: usize,
    /// Calendar year of age offset 0.
    pub cohort_year: i32,
    #[serde(default)]
    pub observed_years: ObservedYears,
    #[serde(default)]
    pub parallel: bool,
}

impl SimulationConfig {
    /// Number of age bins, `end_age - start_age + 1`.
    pub fn age_span(&self) -> usize {
        (self.end_age.saturating_sub(self.start_age) + 1) as usize
    }

    /// Age offsets covered by the observed calendar years.
    pub fn observation_window(&self) -> Result<Range<usize>> {
        let span = self.age_span();
        let start = self.observed_years.start - self.cohort_year;
        let end = self.observed_years.end - self.cohort_year;
        if start < 0 || end <= start || end as usize > span {
            return Err(CalibrationError::InvalidWindow {
                start: self.observed_years.start,
                end: self.observed_years.end,
                cohort_year: self.cohort_year,
                span,
            });
        }
        Ok(start as usize..end as usize)
    }

    pub fn validate(&self) -> Result<()> {
        if self.end_age < self.start_age {
            return Err(CalibrationError::InvalidAgeRange {
                start_age: self.start_age,
                end_age: self.end_age,
            });
        }
        if self.num_patients == 0 {
            return Err(CalibrationError::InvalidParameter {
                name: "num_patients",
                value: 0.0,
            });
        }
        Ok(())
    }
}

fn default_progress_interval() -> usize {
    100
}

fn default_smoothing_window() -> usize {
    10
}

fn default_smoothing_polyorder() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnealingConfig {
    pub iterations: usize,
    pub start_temp: f64,
    pub step_size: f64,
    /// Expected fraction of candidate entries left unperturbed per step.
    pub mask_size: f64,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,
    #[serde(default = "default_smoothing_polyorder")]
    pub smoothing_polyorder: usize,
    #[serde(default)]
    pub loss: Loss,
}

impl AnnealingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.start_temp > 0.0) {
            return Err(CalibrationError::NonPositiveTemperature(self.start_temp));
        }
        if !(self.step_size >= 0.0) || !self.step_size.is_finite() {
            return Err(CalibrationError::InvalidParameter {
                name: "step_size",
                value: self.step_size,
            });
        }
        if !(0.0..=1.0).contains(&self.mask_size) {
            return Err(CalibrationError::InvalidParameter {
                name: "mask_size",
                value: self.mask_size,
            });
        }
        if self.progress_interval == 0 {
            return Err(CalibrationError::InvalidParameter {
                name: "progress_interval",
                value: 0.0,
            });
        }
        if self.smoothing_polyorder >= self.smoothing_window {
            return Err(CalibrationError::InvalidParameter {
                name: "smoothing_polyorder",
                value: self.smoothing_polyorder as f64,
            });
        }
        Ok(())
    }
}

/// Externally supplied tables, all indexed by age offset from `start_age`
/// except `cancer_incidence`, which covers the observation window only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationTables {
    /// Cumulative all-cause mortality distribution.
    pub mortality_cdf: Vec<f64>,
    /// Initial cancer-onset density.
    pub cancer_pdf: Vec<f64>,
    /// Observed incidence per 100,000.
    pub cancer_incidence: Vec<f64>,
}

impl CalibrationTables {
    pub fn validate(&self, sim: &SimulationConfig) -> Result<()> {
        let span = sim.age_span();
        validate_cdf("mortality_cdf", &self.mortality_cdf, span)?;
        validate_pdf("cancer_pdf", &self.cancer_pdf, span)?;

        let window = sim.observation_window()?;
        if self.cancer_incidence.len() != window.len() {
            return Err(CalibrationError::LengthMismatch {
                name: "cancer_incidence",
                expected: window.len(),
                actual: self.cancer_incidence.len(),
            });
        }
        if let Some((index, &value)) = self
            .cancer_incidence
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(CalibrationError::ValueOutOfRange {
                name: "cancer_incidence",
                index,
                value,
            });
        }
        Ok(())
    }
}

/// Checks a cumulative table: expected length, values in [0, 1], non-decreasing.
pub fn validate_cdf(name: &'static str, cdf: &[f64], len: usize) -> Result<()> {
    check_len(name, cdf, len)?;
    for (index, &value) in cdf.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(CalibrationError::ValueOutOfRange { name, index, value });
        }
        if index > 0 && value < cdf[index - 1] {
            return Err(CalibrationError::NonMonotonic { name, index });
        }
    }
    Ok(())
}

/// Checks a density table: expected length, finite non-negative values.
pub fn validate_pdf(name: &'static str, pdf: &[f64], len: usize) -> Result<()> {
    check_len(name, pdf, len)?;
    if let Some((index, &value)) = pdf
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(CalibrationError::ValueOutOfRange { name, index, value });
    }
    Ok(())
}

fn check_len(name: &'static str, table: &[f64], len: usize) -> Result<()> {
    if table.is_empty() {
        return Err(CalibrationError::EmptyTable { name });
    }
    if table.len() != len {
        return Err(CalibrationError::LengthMismatch {
            name,
            expected: len,
            actual: table.len(),
        });
    }
    Ok(())
}

/// Complete input for one calibration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    pub simulation: SimulationConfig,
    pub annealing: AnnealingConfig,
    pub tables: CalibrationTables,
    /// RNG seed; a random one is chosen when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl CalibrationConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.annealing.validate()?;
        self.tables.validate(&self.simulation)?;
        if self.annealing.smoothing_window > self.tables.cancer_pdf.len() {
            return Err(CalibrationError::InvalidParameter {
                name: "smoothing_window",
                value: self.annealing.smoothing_window as f64,
            });
        }
        Ok(())
    }
}
