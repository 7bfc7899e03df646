//! Bounded reparameterization.
//!
//! The solver works in unconstrained space; physical parameters are confined
//! to data-derived open intervals through a smooth, invertible arctangent
//! squash:
//!
//! ```text
//! squash(u) = ((hi - lo)/π)·atan(u) + (lo + hi)/2
//! ```
//!
//! The output lies strictly inside `(lo, hi)` for every finite `u` and
//! approaches the endpoints as `u → ±∞`, so any unconstrained line-search
//! optimizer respects the physical bounds for free.
//!
//! Bound derivation is deliberately anchored on the *boundary samples* of
//! the series, not on true extrema:
//!
//! - RN ∈ (R_first, R_last)
//! - Tc ∈ (T_first, T_last)
//! - T1, T2 ∈ (0, T_last)
//!
//! The choice affects fit results (slightly different intervals shift where
//! the squash saturates), so it lives here as one named policy rather than
//! being folded into the residual formula. Swapping in a min/max rule means
//! changing `derive_bounds` only.

use std::f64::consts::PI;

use crate::domain::{Interval, ParamBounds, RtSeries, TransitionParams};
use crate::error::AppError;

/// Map an unconstrained value into the interval.
pub fn squash(interval: &Interval, u: f64) -> f64 {
    (interval.width() / PI) * u.atan() + interval.midpoint()
}

/// Inverse of [`squash`]: recover the unconstrained value for a point
/// strictly inside the interval.
pub fn unsquash(interval: &Interval, v: f64) -> f64 {
    (PI * (v - interval.midpoint()) / interval.width()).tan()
}

/// Squash a raw `[rn, tc, t1, t2]` vector into physical parameters.
pub fn squash_params(raw: &[f64; 4], bounds: &ParamBounds) -> TransitionParams {
    TransitionParams {
        rn: squash(&bounds.rn, raw[0]),
        tc: squash(&bounds.tc, raw[1]),
        t1: squash(&bounds.t1, raw[2]),
        t2: squash(&bounds.t2, raw[3]),
    }
}

/// Derive the bound intervals for a series (boundary-sample policy).
///
/// Fails fast when any interval has zero or negative width, or a non-finite
/// endpoint: a degenerate interval would collapse the squash onto a constant
/// and the fit would silently stall there instead of here.
pub fn derive_bounds(series: &RtSeries) -> Result<ParamBounds, AppError> {
    let n = series.len();
    if n < 2 {
        return Err(AppError::new(
            3,
            "Bound derivation needs at least 2 points.",
        ));
    }

    let bounds = ParamBounds {
        rn: Interval {
            lo: series.resistance[0],
            hi: series.resistance[n - 1],
        },
        tc: Interval {
            lo: series.temperature[0],
            hi: series.temperature[n - 1],
        },
        t1: Interval {
            lo: 0.0,
            hi: series.temperature[n - 1],
        },
        t2: Interval {
            lo: 0.0,
            hi: series.temperature[n - 1],
        },
    };

    for (name, interval) in [
        ("RN", &bounds.rn),
        ("Tc", &bounds.tc),
        ("T1", &bounds.t1),
        ("T2", &bounds.t2),
    ] {
        if !(interval.lo.is_finite() && interval.hi.is_finite()) {
            return Err(AppError::new(
                3,
                format!("Non-finite bound interval for {name}."),
            ));
        }
        if interval.width() <= 0.0 {
            return Err(AppError::new(
                3,
                format!(
                    "Degenerate bound interval for {name}: ({}, {}).",
                    interval.lo, interval.hi
                ),
            ));
        }
    }

    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> RtSeries {
        RtSeries {
            temperature: vec![180.0, 190.0, 200.0, 210.0, 220.0],
            resistance: vec![0.01, 0.5, 7.5, 14.5, 15.0],
        }
    }

    #[test]
    fn squash_stays_strictly_inside() {
        let iv = Interval { lo: 180.0, hi: 220.0 };
        for &u in &[-1e6, -10.0, -0.1, 0.0, 0.1, 10.0, 1e6] {
            let v = squash(&iv, u);
            assert!(v > iv.lo && v < iv.hi, "u={u} -> {v}");
        }
        // Midpoint at u = 0.
        assert!((squash(&iv, 0.0) - 200.0).abs() < 1e-12);
    }

    #[test]
    fn unsquash_inverts_squash() {
        let iv = Interval { lo: 0.0, hi: 220.0 };
        for &u in &[-5.0, -0.3, 0.0, 0.7, 12.0] {
            let round = unsquash(&iv, squash(&iv, u));
            assert!((round - u).abs() < 1e-9 * (1.0 + u.abs()), "u={u} -> {round}");
        }
    }

    #[test]
    fn bounds_use_boundary_samples_not_extrema() {
        // Last resistance below an interior maximum: the interval must still
        // anchor on the boundary samples.
        let s = RtSeries {
            temperature: vec![180.0, 200.0, 220.0],
            resistance: vec![1.0, 20.0, 15.0],
        };
        let b = derive_bounds(&s).unwrap();
        assert_eq!(b.rn.lo, 1.0);
        assert_eq!(b.rn.hi, 15.0);
    }

    #[test]
    fn degenerate_temperature_interval_is_rejected() {
        let s = RtSeries {
            temperature: vec![200.0, 200.0, 200.0, 200.0],
            resistance: vec![1.0, 2.0, 3.0, 4.0],
        };
        let err = derive_bounds(&s).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn normal_series_yields_positive_widths() {
        let b = derive_bounds(&series()).unwrap();
        assert!(b.rn.width() > 0.0);
        assert!(b.tc.width() > 0.0);
        assert!(b.t1.width() > 0.0);
        assert!(b.t2.width() > 0.0);
    }
}
