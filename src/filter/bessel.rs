//! Second-order low-pass Bessel design for decimated readout.
//!
//! Bessel filters have maximally flat group delay, so pulse shapes survive
//! smoothing without phase distortion; that is why the readout chain uses
//! them ahead of decimation.
//!
//! Design steps:
//!
//! 1. `normalized_cutoff` turns `(rate, fs)` into the dimensionless cutoff
//!    `ws`, measured on a scale where 2 is the Nyquist frequency.
//! 2. Prewarp to the analog corner `ωa = tan(π·ws/4)`.
//! 3. Scale the phase-normalized analog prototype `1/(s² + √3·s + 1)`
//!    (the standard-table second-order Bessel section, Q = 1/√3).
//! 4. Bilinear transform, normalized so `a[0] = 1`.
//!
//! The prototype scaling and bilinear transform collapse to closed forms for
//! a single second-order section, so no polynomial machinery is needed.

use std::f64::consts::PI;

use crate::domain::FilterDesign;
use crate::error::AppError;

/// Dimensionless cutoff for a decimation `rate` at sample frequency `fs`.
///
/// This is the historical formula, kept literally: it divides `fs` by `rate`
/// where the textbook normalization would divide the target cutoff `fs/rate`
/// by the Nyquist frequency. Every stored coefficient set was produced with
/// it, so correcting the convention is a deliberate one-line change here,
/// with the regression test below repinned at the same time.
pub fn normalized_cutoff(rate: f64, fs: f64) -> f64 {
    fs / rate * 2.0
}

/// Design a 2nd-order low-pass Bessel filter.
///
/// `rate` is the decimation factor, `fs` the reference sample frequency.
/// Fails when the resulting normalized cutoff leaves `(0, 2)` (at or above
/// Nyquist, or non-positive).
pub fn design_low_pass(rate: f64, fs: f64) -> Result<FilterDesign, AppError> {
    let ws = normalized_cutoff(rate, fs);
    if !ws.is_finite() || ws <= 0.0 || ws >= 2.0 {
        return Err(AppError::new(
            2,
            format!(
                "Normalized cutoff {ws} is outside (0, 2); \
                 rate={rate}, fs={fs} do not describe a realizable low-pass."
            ),
        ));
    }

    // ws is measured against Nyquist = 2, so the prewarped analog corner is
    // tan(π/2 · ws/2).
    let wa = (PI * ws / 4.0).tan();
    let damp = 3.0_f64.sqrt();

    let a0 = 1.0 + damp * wa + wa * wa;
    let design = FilterDesign {
        b: [wa * wa / a0, 2.0 * wa * wa / a0, wa * wa / a0],
        a: [
            1.0,
            (2.0 * wa * wa - 2.0) / a0,
            (1.0 - damp * wa + wa * wa) / a0,
        ],
    };

    if design
        .b
        .iter()
        .chain(design.a.iter())
        .any(|c| !c.is_finite())
    {
        return Err(AppError::new(
            2,
            format!("Filter design degenerated at normalized cutoff {ws}."),
        ));
    }

    Ok(design)
}
