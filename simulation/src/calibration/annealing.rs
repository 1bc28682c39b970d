//! Simulated annealing over onset-age distributions
//!
//! Each iteration perturbs the current candidate, scores it by running the
//! cohort, and accepts it with the Metropolis criterion against the current
//! (not the best) score. The best candidate seen is tracked independently.

use rand::Rng;
use std::ops::Range;
use tracing::{debug, info};

use super::objective::{objective, Loss};
use super::smoothing::SavgolFilter;
use super::step::step;
use crate::cohort::CohortSimulator;
use crate::config::{validate_pdf, AnnealingConfig};
use crate::error::{CalibrationError, Result};

/// `start_temp / (1 + ln(iteration + 1))`.
pub fn temperature(start_temp: f64, iteration: usize) -> f64 {
    start_temp / (1.0 + ((iteration + 1) as f64).ln())
}

/// Improvements always pass without a draw. Otherwise one uniform draw is
/// compared against `exp(-diff / temperature)`, so ties always pass.
pub fn metropolis_accepts<R: Rng + ?Sized>(diff: f64, temperature: f64, rng: &mut R) -> bool {
    diff < 0.0 || rng.gen::<f64>() < (-diff / temperature).exp()
}

/// Search state carried from one iteration to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingState {
    pub current: Vec<f64>,
    pub current_score: f64,
    pub best: Vec<f64>,
    pub best_score: f64,
}

/// What one iteration did with its candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub new_best: bool,
    pub accepted: bool,
}

impl AnnealingState {
    pub fn new(initial: Vec<f64>, score: f64) -> Self {
        Self {
            current: initial.clone(),
            current_score: score,
            best: initial,
            best_score: score,
        }
    }

    /// Fold one scored candidate into the state.
    pub fn advance<R: Rng + ?Sized>(
        mut self,
        candidate: Vec<f64>,
        candidate_score: f64,
        temperature: f64,
        rng: &mut R,
    ) -> (Self, Transition) {
        let new_best = candidate_score < self.best_score;
        if new_best {
            self.best = candidate.clone();
            self.best_score = candidate_score;
        }

        let diff = candidate_score - self.current_score;
        let accepted = metropolis_accepts(diff, temperature, rng);
        if accepted {
            self.current = candidate;
            self.current_score = candidate_score;
        }

        (self, Transition { new_best, accepted })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationOutcome {
    /// Lowest-scoring distribution found.
    pub best: Vec<f64>,
    pub best_score: f64,
    pub initial_score: f64,
    pub iterations: usize,
    pub accepted_moves: usize,
    pub improvements: usize,
}

/// Calibrate `initial_pdf` so the simulated incidence matches `expected_incidence`.
///
/// All inputs are validated before the first cohort run.
pub fn simulated_annealing<R: Rng + ?Sized>(
    simulator: &mut CohortSimulator,
    initial_pdf: &[f64],
    expected_incidence: &[f64],
    config: &AnnealingConfig,
    rng: &mut R,
) -> Result<CalibrationOutcome> {
    config.validate()?;
    validate_pdf("cancer_pdf", initial_pdf, simulator.config().age_span())?;
    let window = simulator.config().observation_window()?;
    if expected_incidence.len() != window.len() {
        return Err(CalibrationError::LengthMismatch {
            name: "cancer_incidence",
            expected: window.len(),
            actual: expected_incidence.len(),
        });
    }
    let filter = SavgolFilter::new(config.smoothing_window, config.smoothing_polyorder)?;
    if filter.window_length() > initial_pdf.len() {
        return Err(CalibrationError::InvalidParameter {
            name: "smoothing_window",
            value: filter.window_length() as f64,
        });
    }

    let initial_score = evaluate(
        simulator,
        initial_pdf,
        expected_incidence,
        &window,
        config.loss,
        rng,
    )?;
    let mut state = AnnealingState::new(initial_pdf.to_vec(), initial_score);
    let mut accepted_moves = 0;
    let mut improvements = 0;

    for i in 0..config.iterations {
        let candidate = step(
            state.current.clone(),
            config.step_size,
            config.mask_size,
            &filter,
            rng,
        )?;
        let candidate_score = evaluate(
            simulator,
            &candidate,
            expected_incidence,
            &window,
            config.loss,
            rng,
        )?;
        let t = temperature(config.start_temp, i);

        let (next, transition) = state.advance(candidate, candidate_score, t, rng);
        state = next;
        if config.verbose && i % config.progress_interval == 0 {
            info!("Iteration: {}, Score = {}", i, state.best_score);
        }
        if transition.new_best {
            improvements += 1;
        }
        if transition.accepted {
            accepted_moves += 1;
        }
        debug!(
            iteration = i,
            temperature = t,
            candidate_score,
            accepted = transition.accepted,
            "annealing step"
        );
    }

    info!("Best score: {}", state.best_score);

    Ok(CalibrationOutcome {
        best: state.best,
        best_score: state.best_score,
        initial_score,
        iterations: config.iterations,
        accepted_moves,
        improvements,
    })
}

fn evaluate<R: Rng + ?Sized>(
    simulator: &mut CohortSimulator,
    pdf: &[f64],
    expected_incidence: &[f64],
    window: &Range<usize>,
    loss: Loss,
    rng: &mut R,
) -> Result<f64> {
    let simulated = simulator.run(pdf, rng)?.incidence_rate();
    objective(simulated, expected_incidence, window.clone(), loss)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ObservedYears, SimulationConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn annealing(iterations: usize) -> AnnealingConfig {
        AnnealingConfig {
            iterations,
            start_temp: 10.0,
            step_size: 0.002,
            mask_size: 0.5,
            verbose: true,
            progress_interval: 100,
            smoothing_window: 10,
            smoothing_polyorder: 3,
            loss: Loss::MeanSquaredError,
        }
    }

    /// 20 age bins from age 40, observed over offsets 5..15.
    fn simulator() -> CohortSimulator {
        let config = SimulationConfig {
            start_age: 40,
            end_age: 59,
            num_patients: 300,
            cohort_year: 1970,
            observed_years: ObservedYears {
                start: 1975,
                end: 1985,
            },
            parallel: false,
        };
        let cdf = (1..=20).map(|i| i as f64 / 20.0).collect();
        CohortSimulator::new(config, cdf).unwrap()
    }

    #[test]
    fn test_temperature_schedule() {
        assert_eq!(temperature(10.0, 0), 10.0);
        assert!(temperature(10.0, 1) < temperature(10.0, 0));
        assert!(temperature(10.0, 10_000) > 0.0);
    }

    #[test]
    fn test_ties_are_always_accepted() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..1000 {
            assert!(metropolis_accepts(0.0, 1e-9, &mut rng));
        }
    }

    #[test]
    fn test_large_regressions_rejected_when_cold() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(!metropolis_accepts(1e6, 1e-3, &mut rng));
    }

    #[test]
    fn test_worse_candidate_can_become_current_but_not_best() {
        let mut rng = StdRng::seed_from_u64(0);
        let state = AnnealingState::new(vec![0.1], 5.0);
        // Hot enough that the acceptance probability is within 1e-12 of 1
        let (state, transition) = state.advance(vec![0.2], 6.0, 1e12, &mut rng);
        assert!(transition.accepted);
        assert!(!transition.new_best);
        assert_eq!(state.current, vec![0.2]);
        assert_eq!(state.best, vec![0.1]);
        assert_eq!(state.best_score, 5.0);
    }

    #[test]
    fn test_improvement_updates_best_and_current() {
        let mut rng = StdRng::seed_from_u64(0);
        let state = AnnealingState::new(vec![0.1], 5.0);
        let (state, transition) = state.advance(vec![0.3], 1.0, 1.0, &mut rng);
        assert_eq!(
            transition,
            Transition {
                new_best: true,
                accepted: true
            }
        );
        assert_eq!(state.best, state.current);
        assert_eq!(state.best_score, 1.0);
    }

    #[test]
    fn test_zero_iterations_returns_initial_pdf() {
        let mut sim = simulator();
        let pdf = vec![0.01; 20];
        let expected = vec![500.0; 10];
        let mut rng = StdRng::seed_from_u64(42);

        let outcome =
            simulated_annealing(&mut sim, &pdf, &expected, &annealing(0), &mut rng).unwrap();
        assert_eq!(outcome.best, pdf);
        assert_eq!(outcome.best_score, outcome.initial_score);
        assert_eq!(outcome.accepted_moves, 0);
    }

    #[test]
    fn test_best_score_never_worse_than_initial() {
        let mut sim = simulator();
        let pdf = vec![0.02; 20];
        let expected = vec![1000.0; 10];
        let mut rng = StdRng::seed_from_u64(7);

        let outcome =
            simulated_annealing(&mut sim, &pdf, &expected, &annealing(25), &mut rng).unwrap();
        assert!(outcome.best_score <= outcome.initial_score);
        assert_eq!(outcome.best.len(), 20);
        assert!(outcome.best.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!(outcome.accepted_moves <= 25);
    }

    #[test]
    fn test_seeded_calibration_is_reproducible() {
        let pdf = vec![0.02; 20];
        let expected = vec![800.0; 10];

        let mut sim = simulator();
        let mut rng = StdRng::seed_from_u64(3);
        let a = simulated_annealing(&mut sim, &pdf, &expected, &annealing(10), &mut rng).unwrap();
        let mut sim = simulator();
        let mut rng = StdRng::seed_from_u64(3);
        let b = simulated_annealing(&mut sim, &pdf, &expected, &annealing(10), &mut rng).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_fails_before_running() {
        let mut sim = simulator();
        let pdf = vec![0.02; 20];
        let mut rng = StdRng::seed_from_u64(0);

        let mut config = annealing(5);
        config.start_temp = -1.0;
        assert!(matches!(
            simulated_annealing(&mut sim, &pdf, &[0.0; 10], &config, &mut rng),
            Err(CalibrationError::NonPositiveTemperature(_))
        ));
        assert!(sim.log().is_empty());

        assert!(matches!(
            simulated_annealing(&mut sim, &pdf, &[0.0; 9], &annealing(5), &mut rng),
            Err(CalibrationError::LengthMismatch { .. })
        ));
    }
}
