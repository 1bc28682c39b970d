//! Calibration of the cancer-onset distribution against observed incidence

pub mod annealing;
pub mod objective;
pub mod smoothing;
pub mod step;

pub use annealing::{
    metropolis_accepts, simulated_annealing, temperature, AnnealingState, CalibrationOutcome,
    Transition,
};
pub use objective::{objective, Loss};
pub use smoothing::SavgolFilter;
pub use step::step;

use rand::Rng;
use tracing::info;

use crate::cohort::CohortSimulator;
use crate::config::CalibrationConfig;
use crate::error::Result;

/// Validate `config`, build its cohort and calibrate the initial density.
///
/// The returned simulator holds the run of the best distribution.
pub fn calibrate<R: Rng + ?Sized>(
    config: &CalibrationConfig,
    rng: &mut R,
) -> Result<(CalibrationOutcome, CohortSimulator)> {
    config.validate()?;

    let mut simulator =
        CohortSimulator::new(config.simulation.clone(), config.tables.mortality_cdf.clone())?;
    info!(
        "Calibrating {} patients over ages {}..={} for {} iterations",
        simulator.population(),
        config.simulation.start_age,
        config.simulation.end_age,
        config.annealing.iterations
    );

    let outcome = simulated_annealing(
        &mut simulator,
        &config.tables.cancer_pdf,
        &config.tables.cancer_incidence,
        &config.annealing,
        rng,
    )?;
    simulator.run(&outcome.best, rng)?;

    Ok((outcome, simulator))
}
