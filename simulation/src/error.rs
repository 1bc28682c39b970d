//! Error types for simulation and calibration

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("table `{name}` is empty")]
    EmptyTable { name: &'static str },

    #[error("table `{name}` has {actual} entries, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("table `{name}` value {value} at index {index} is outside the allowed range")]
    ValueOutOfRange {
        name: &'static str,
        index: usize,
        value: f64,
    },

    #[error("cumulative table `{name}` decreases at index {index}")]
    NonMonotonic { name: &'static str, index: usize },

    #[error("end age {end_age} is below start age {start_age}")]
    InvalidAgeRange { start_age: u32, end_age: u32 },

    #[error("observed years {start}..{end} do not fit ages {span} from cohort year {cohort_year}")]
    InvalidWindow {
        start: i32,
        end: i32,
        cohort_year: i32,
        span: usize,
    },

    #[error("start temperature must be positive, got {0}")]
    NonPositiveTemperature(f64),

    #[error("parameter `{name}` has invalid value {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("smoothing failed: {0}")]
    Smoothing(String),

    #[error("unsupported report version: {0}")]
    UnsupportedVersion(u8),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CalibrationError>;
