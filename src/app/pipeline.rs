//! Shared "fit pipeline" logic.
//!
//! Keeping this in one place means the CLI (and any future front-end) only
//! handles presentation:
//!
//! CSV ingest -> fit -> residuals -> diagnostics

use crate::domain::{FitRunConfig, TransitionFit};
use crate::error::AppError;
use crate::fit::{fit_transition, FitOptions, SolverOptions};
use crate::io::ingest::{load_rt_series, IngestedSeries};
use crate::report::{compute_residuals, transition_diagnostics, PointResidual, TransitionDiagnostics};

/// Points in the sensitivity profile computed per run.
const PROFILE_POINTS: usize = 200;

/// All computed outputs of a single `tescal fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedSeries,
    pub fit: TransitionFit,
    pub residuals: Vec<PointResidual>,
    pub diagnostics: Option<TransitionDiagnostics>,
}

/// Execute the full fit pipeline and return the computed outputs.
pub fn run_fit(config: &FitRunConfig) -> Result<RunOutput, AppError> {
    let ingest = load_rt_series(&config.csv_path)?;

    let opts = FitOptions {
        initial: config.initial,
        solver: SolverOptions {
            max_iters: config.max_iters,
            tolerance: config.tolerance,
            ..SolverOptions::default()
        },
    };
    let fit = fit_transition(&ingest.series, &opts)?;

    let residuals = compute_residuals(&ingest.series, &fit);
    let diagnostics = transition_diagnostics(&fit, &ingest.series, PROFILE_POINTS);

    Ok(RunOutput {
        ingest,
        fit,
        residuals,
        diagnostics,
    })
}
