//! Per-patient sampling and cohort aggregation

pub mod incidence;
pub mod mortality;

pub use incidence::{alive_at_age, incidence_rates, AgeCounts, RATE_SCALE};
pub use mortality::{cumulative_sum, insertion_point, sample_offset, RiskTables};
