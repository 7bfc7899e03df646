//! Transition-curve model evaluation.
//!
//! The fitter relies on two primitive operations:
//! - predict `R(T)` given physical parameters (for residuals/plots)
//! - build the residual vector for a raw parameter vector (for the solver)
//!
//! The model is a double-logistic transition curve with independent rise and
//! fall widths:
//!
//! ```text
//! R(T) = RN · σ((T - Tc)/T1) · σ((T - Tc)/T2)
//! ```
//!
//! where `σ` is the logistic function. This is algebraically identical to
//! the `RN / [(1+e^{-(T-Tc)/T1})(1+e^{-(T-Tc)/T2})]` form, but evaluating
//! through `math::logistic` keeps the exponentials bounded when a width
//! collapses toward zero.

use crate::domain::{ParamBounds, RtSeries, TransitionParams};
use crate::fit::bounds::squash_params;
use crate::math::logistic;

/// Predict `R(T)` for the given physical parameters.
pub fn predict(params: &TransitionParams, t: f64) -> f64 {
    let x = t - params.tc;
    params.rn * logistic(x / params.t1) * logistic(x / params.t2)
}

/// Logarithmic temperature sensitivity `α(T) = (T/R)·dR/dT`.
///
/// Closed form for the double-logistic curve:
///
/// ```text
/// α(T) = T · [ (1 - σ1)/T1 + (1 - σ2)/T2 ]
/// ```
///
/// with `σi = σ((T - Tc)/Ti)`, so no finite differencing is needed.
pub fn alpha(params: &TransitionParams, t: f64) -> f64 {
    let x = t - params.tc;
    let s1 = logistic(x / params.t1);
    let s2 = logistic(x / params.t2);
    t * ((1.0 - s1) / params.t1 + (1.0 - s2) / params.t2)
}

/// Residuals `R_obs[i] - R(T[i])` for a raw (unconstrained) parameter vector.
///
/// The raw vector is squashed through the series-derived bound intervals
/// first; the solver never sees physical space.
pub fn residuals(raw: &[f64; 4], series: &RtSeries, bounds: &ParamBounds, out: &mut Vec<f64>) {
    let params = squash_params(raw, bounds);
    out.clear();
    out.reserve(series.len());
    for i in 0..series.len() {
        out.push(series.resistance[i] - predict(&params, series.temperature[i]));
    }
}
