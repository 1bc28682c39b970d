//! Cancer Incidence Calibration Engine
//!
//! Simulates a cohort through competing risks (other-cause death vs. cancer
//! onset) and calibrates the onset-age distribution by simulated annealing so
//! simulated incidence matches observed data.

pub mod calibration;
pub mod cohort;
pub mod components;
pub mod config;
pub mod error;
pub mod patient;
pub mod persistence;
pub mod systems;

pub use calibration::{calibrate, simulated_annealing, CalibrationOutcome, Loss};
pub use cohort::CohortSimulator;
pub use components::*;
pub use config::{AnnealingConfig, CalibrationConfig, CalibrationTables, SimulationConfig};
pub use error::{CalibrationError, Result};
pub use patient::Patient;
pub use persistence::CalibrationReport;
