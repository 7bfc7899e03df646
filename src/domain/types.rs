//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they
//! can be:
//!
//! - used in-memory during fitting
//! - exported to JSON for downstream analysis
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A resistance-vs-temperature measurement series for one sensor channel.
///
/// Temperatures are in mK, resistances in mΩ. The two sequences are index
/// aligned; temperature is assumed non-decreasing (upstream acquisition
/// sorts by bath temperature) and is not re-validated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtSeries {
    pub temperature: Vec<f64>,
    pub resistance: Vec<f64>,
}

impl RtSeries {
    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }
}

/// Physical transition parameters.
///
/// - `rn`: normal-state resistance (mΩ)
/// - `tc`: critical temperature (mK)
/// - `t1`, `t2`: characteristic transition widths (mK)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransitionParams {
    pub rn: f64,
    pub tc: f64,
    pub t1: f64,
    pub t2: f64,
}

/// An open interval `(lo, hi)` used to confine one physical parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn midpoint(&self) -> f64 {
        (self.lo + self.hi) / 2.0
    }
}

/// Per-parameter bound intervals derived from a measurement series.
///
/// The derivation rule is `fit::bounds::derive_bounds`; results carry the
/// intervals so a consumer can re-apply or audit the reparameterization
/// without access to the original series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParamBounds {
    pub rn: Interval,
    pub tc: Interval,
    pub t1: Interval,
    pub t2: Interval,
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
}

/// Result of one transition fit.
///
/// `raw` is the unconstrained optimizer vector `[rn, tc, t1, t2]`, the
/// historical exchange format for this fit. `params` and `bounds` are the
/// physical view obtained by squashing `raw` through the bound intervals, so
/// consumers never have to replicate the reparameterization themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionFit {
    pub raw: [f64; 4],
    pub params: TransitionParams,
    pub bounds: ParamBounds,
    pub quality: FitQuality,
    pub converged: bool,
    pub iterations: usize,
}

/// Second-order digital filter coefficients, normalized so `a[0] == 1`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FilterDesign {
    pub b: [f64; 3],
    pub a: [f64; 3],
}

/// Specification for a synthetic RT series.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub params: TransitionParams,
    pub temp_min: f64,
    pub temp_max: f64,
    pub count: usize,
    pub noise_sigma: f64,
    pub seed: u64,
}

/// A full `tescal fit` run configuration, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct FitRunConfig {
    pub csv_path: PathBuf,
    pub max_iters: usize,
    pub tolerance: f64,
    /// Optional raw-space starting point; `None` uses the documented default.
    pub initial: Option<[f64; 4]>,
    pub grid_points: usize,
    pub export_fit: Option<PathBuf>,
}

/// Exported fit file (JSON). The portable representation of one calibration:
/// parameters in both spaces, the bound intervals, and a precomputed fitted
/// grid for quick plotting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub fit: TransitionFit,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub temperature: Vec<f64>,
    pub resistance: Vec<f64>,
}

/// Exported filter file (JSON): the design inputs alongside the normalized
/// cutoff and coefficients actually produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterFile {
    pub tool: String,
    pub rate: f64,
    pub fs: f64,
    pub normalized_cutoff: f64,
    pub design: FilterDesign,
}
