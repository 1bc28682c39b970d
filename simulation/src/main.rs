//! Calibration Runner
//!
//! Usage: `incidence-calibration <config.json> [report.json]`

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simulation::{calibrate, CalibrationConfig, CalibrationReport};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .context("usage: incidence-calibration <config.json> [report.json]")?;
    let report_path = args
        .next()
        .unwrap_or_else(|| "calibration_report.json".to_string());

    let config = CalibrationConfig::load_from_file(&config_path)
        .with_context(|| format!("failed to load {}", config_path))?;

    // Initialize tracing
    let level = if config.annealing.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Incidence calibration starting...");

    // Generate or use provided seed
    let seed = config.seed.unwrap_or_else(rand::random::<u64>);
    info!("Using seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let start = std::time::Instant::now();
    let (outcome, simulator) = calibrate(&config, &mut rng)?;
    let elapsed = start.elapsed();

    info!(
        "Calibration complete: {:?} total, {:?} per iteration, score {} -> {}, {} moves accepted",
        elapsed,
        elapsed / (outcome.iterations as u32 + 1),
        outcome.initial_score,
        outcome.best_score,
        outcome.accepted_moves
    );

    if let Some(stats) = memory_stats::memory_stats() {
        info!("Physical memory: {} bytes", stats.physical_mem);
    }

    let report = CalibrationReport::new(&outcome, &simulator, seed);
    let bytes = report
        .save_to_file(&report_path)
        .with_context(|| format!("failed to write {}", report_path))?;
    info!("Report written to {} ({} bytes)", report_path, bytes);

    Ok(())
}
