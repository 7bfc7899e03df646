//! Reporting utilities: residuals and transition diagnostics.

pub mod format;

use serde::{Deserialize, Serialize};

use crate::domain::{RtSeries, TransitionFit};
use crate::model;

/// Bias window edges, as percent of the normal-state resistance.
const BIAS_LOW_PCT: f64 = 10.0;
const BIAS_HIGH_PCT: f64 = 90.0;

/// Scan resolution when locating the bias window on the fitted curve.
const WINDOW_SCAN_POINTS: usize = 1000;

/// A per-point fitted result.
#[derive(Debug, Clone, Copy)]
pub struct PointResidual {
    pub temperature: f64,
    pub r_obs: f64,
    pub r_fit: f64,
    pub residual: f64,
}

/// Compute fitted values and residuals for each observation.
pub fn compute_residuals(series: &RtSeries, fit: &TransitionFit) -> Vec<PointResidual> {
    series
        .temperature
        .iter()
        .zip(&series.resistance)
        .map(|(&t, &r)| {
            let r_fit = model::predict(&fit.params, t);
            PointResidual {
                temperature: t,
                r_obs: r,
                r_fit,
                residual: r - r_fit,
            }
        })
        .collect()
}

/// One sampled point of the sensitivity profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlphaPoint {
    pub temperature: f64,
    pub resistance: f64,
    /// Operating point as percent of RN.
    pub bias_pct: f64,
    /// Logarithmic sensitivity `(T/R)·dR/dT`.
    pub alpha: f64,
}

/// Sensitivity diagnostics across the usable bias window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionDiagnostics {
    /// Temperatures where the fitted curve crosses 10 % and 90 % of RN.
    pub window: (f64, f64),
    pub peak: AlphaPoint,
    pub profile: Vec<AlphaPoint>,
}

/// Locate the 10–90 % RN window on the fitted curve and profile `α(T)`
/// across it.
///
/// The scan range extends slightly past the measured temperatures so a
/// transition sitting near the edge of the sweep still resolves. Returns
/// `None` when the window does not resolve inside the scan range (curve
/// never reaches the crossing levels).
pub fn transition_diagnostics(
    fit: &TransitionFit,
    series: &RtSeries,
    profile_points: usize,
) -> Option<TransitionDiagnostics> {
    let rn = fit.params.rn;
    if !(rn.is_finite() && rn > 0.0) || series.is_empty() {
        return None;
    }

    let t_start = series.temperature[0] - 2.0;
    let t_end = series.temperature[series.len() - 1] + 2.0;
    let r_low = rn * BIAS_LOW_PCT / 100.0;
    let r_high = rn * BIAS_HIGH_PCT / 100.0;

    // The fitted curve is monotone increasing in T, so the first scan point
    // above each level is the crossing.
    let mut t_low = None;
    let mut t_high = None;
    for i in 0..WINDOW_SCAN_POINTS {
        let u = i as f64 / (WINDOW_SCAN_POINTS as f64 - 1.0);
        let t = t_start + u * (t_end - t_start);
        let r = model::predict(&fit.params, t);
        if t_low.is_none() && r > r_low {
            t_low = Some(t);
        }
        if t_high.is_none() && r > r_high {
            t_high = Some(t);
            break;
        }
    }
    let (t_low, t_high) = (t_low?, t_high?);
    if t_high <= t_low {
        return None;
    }

    let n = profile_points.max(2);
    let mut profile = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let t = t_low + u * (t_high - t_low);
        let r = model::predict(&fit.params, t);
        profile.push(AlphaPoint {
            temperature: t,
            resistance: r,
            bias_pct: 100.0 * r / rn,
            alpha: model::alpha(&fit.params, t),
        });
    }

    let peak = *profile
        .iter()
        .max_by(|a, b| a.alpha.partial_cmp(&b.alpha).unwrap_or(std::cmp::Ordering::Equal))?;

    Some(TransitionDiagnostics {
        window: (t_low, t_high),
        peak,
        profile,
    })
}
