//! Transition fitting for a single RT series.
//!
//! Pipeline for one fit:
//!
//! 1. validate the series shape (aligned lengths, enough points, finite)
//! 2. derive the bound intervals from the boundary samples
//! 3. minimize the squared residuals in unconstrained space, starting from
//!    the documented default (or a caller-supplied raw vector)
//! 4. squash the converged raw vector back into physical parameters
//!
//! The result carries both spaces plus the intervals, so downstream
//! consumers can use whichever representation they need without re-deriving
//! the reparameterization.

use nalgebra::DVector;

use crate::domain::{FitQuality, RtSeries, TransitionFit};
use crate::error::AppError;
use crate::fit::bounds::{derive_bounds, squash_params};
use crate::fit::solver::{minimize, SolverOptions};
use crate::model;

/// Default raw-space starting point.
///
/// Historically fixed; callers with a better physical guess can map it
/// through `bounds::unsquash` and pass it via [`FitOptions::initial`].
pub const DEFAULT_INITIAL: [f64; 4] = [0.1, 0.1, 0.1, 0.1];

/// Four free parameters need at least four observations.
pub const MIN_POINTS: usize = 4;

/// Options for one transition fit.
#[derive(Debug, Clone, Default)]
pub struct FitOptions {
    /// Raw-space starting point; `None` selects [`DEFAULT_INITIAL`].
    pub initial: Option<[f64; 4]>,
    pub solver: SolverOptions,
}

/// Fit the transition model to a measurement series.
pub fn fit_transition(series: &RtSeries, opts: &FitOptions) -> Result<TransitionFit, AppError> {
    if series.temperature.len() != series.resistance.len() {
        return Err(AppError::new(
            3,
            format!(
                "Series length mismatch: {} temperatures vs {} resistances.",
                series.temperature.len(),
                series.resistance.len()
            ),
        ));
    }
    if series.len() < MIN_POINTS {
        return Err(AppError::new(
            3,
            format!(
                "Need at least {MIN_POINTS} points to fit 4 parameters, got {}.",
                series.len()
            ),
        ));
    }
    if series
        .temperature
        .iter()
        .chain(series.resistance.iter())
        .any(|v| !v.is_finite())
    {
        return Err(AppError::new(3, "Series contains non-finite values."));
    }

    let bounds = derive_bounds(series)?;
    let initial = opts.initial.unwrap_or(DEFAULT_INITIAL);

    let residual_fn = |p: &DVector<f64>| {
        let raw = [p[0], p[1], p[2], p[3]];
        let mut out = Vec::with_capacity(series.len());
        model::residuals(&raw, series, &bounds, &mut out);
        DVector::from_vec(out)
    };

    let outcome = minimize(
        residual_fn,
        DVector::from_column_slice(&initial),
        &opts.solver,
    )?;

    let raw = [
        outcome.params[0],
        outcome.params[1],
        outcome.params[2],
        outcome.params[3],
    ];
    if raw.iter().any(|v| !v.is_finite()) {
        return Err(AppError::new(4, "Fit produced non-finite parameters."));
    }

    let n = series.len();
    Ok(TransitionFit {
        raw,
        params: squash_params(&raw, &bounds),
        bounds,
        quality: FitQuality {
            sse: outcome.sse,
            rmse: (outcome.sse / n as f64).sqrt(),
            n,
        },
        converged: outcome.converged,
        iterations: outcome.iterations,
    })
}
