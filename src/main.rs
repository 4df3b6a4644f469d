// src/main.rs
// Command-line driver: loads a planner config, decomposes the survey area and
// writes the coverage plan.

// Imports dependencies and planner modules.
// - env_logger: Logging backend, configured through RUST_LOG.
// - coverage_planner: Config loading, planning session and file exporter.
use coverage_planner::{CoveragePlanner, FilePlanExporter, PlannerConfig};
use log::{error, info};
use std::error::Error;

/// Loads the config named on the command line (or `coverage.yaml`) and
/// exports the resulting plan.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "coverage.yaml".to_string());
    info!("Starting coverage planner with {}", config_path);

    let config = PlannerConfig::from_file(&config_path)?;
    let mut exporter = FilePlanExporter::new(&config.output, config.format);
    let planner = CoveragePlanner::new(config);

    match planner.run(&mut exporter) {
        Ok(plan) => {
            info!("Wrote plan {} to {}", plan.id, exporter.path().display());
            Ok(())
        }
        Err(e) => {
            error!("Planning failed: {}", e);
            Err(e.into())
        }
    }
}
