//! Command-line parsing for the TES calibration toolkit.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "tescal",
    version,
    about = "TES calibration toolkit (RT transition fits + readout filter design)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the transition model to an RT CSV and print diagnostics.
    Fit(FitArgs),
    /// Design the readout low-pass filter; optionally apply it to pulses.
    Filter(FilterArgs),
    /// Generate a synthetic RT CSV from known parameters.
    Sample(SampleArgs),
}

/// Options for `tescal fit`.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// RT CSV file (`T,R` schema).
    pub csv: PathBuf,

    /// Solver iteration budget.
    #[arg(long, default_value_t = 200)]
    pub max_iters: usize,

    /// Relative step tolerance for convergence.
    #[arg(long, default_value_t = 1e-8)]
    pub tol: f64,

    /// Raw-space starting point (defaults to 0.1 0.1 0.1 0.1).
    #[arg(long, num_args = 4, value_names = ["RN", "TC", "T1", "T2"], allow_negative_numbers = true)]
    pub initial: Option<Vec<f64>>,

    /// Points in the exported fitted-curve grid.
    #[arg(long, default_value_t = 201)]
    pub grid_points: usize,

    /// Export the fit (params + bounds + fitted grid) to JSON.
    #[arg(long = "export-fit")]
    pub export_fit: Option<PathBuf>,
}

/// Options for `tescal filter`.
#[derive(Debug, Parser)]
pub struct FilterArgs {
    /// Decimation factor.
    #[arg(long)]
    pub rate: f64,

    /// Reference sample frequency.
    #[arg(long)]
    pub fs: f64,

    /// Export the design to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Zero-phase filter the pulse records in this headerless CSV.
    #[arg(long)]
    pub apply: Option<PathBuf>,

    /// Output CSV for filtered pulse records (required with --apply).
    #[arg(long, requires = "apply")]
    pub out: Option<PathBuf>,
}

/// Options for `tescal sample`.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Normal-state resistance (mOhm).
    #[arg(long, default_value_t = 15.0)]
    pub rn: f64,

    /// Critical temperature (mK).
    #[arg(long, default_value_t = 200.0)]
    pub tc: f64,

    /// First transition width (mK).
    #[arg(long, default_value_t = 2.0)]
    pub t1: f64,

    /// Second transition width (mK).
    #[arg(long, default_value_t = 2.0)]
    pub t2: f64,

    /// Sweep start temperature (mK).
    #[arg(long, default_value_t = 180.0)]
    pub temp_min: f64,

    /// Sweep end temperature (mK).
    #[arg(long, default_value_t = 220.0)]
    pub temp_max: f64,

    /// Number of points.
    #[arg(long, default_value_t = 41)]
    pub count: usize,

    /// Gaussian noise sigma (mOhm).
    #[arg(long, default_value_t = 0.02)]
    pub noise: f64,

    /// RNG seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV path.
    pub out: PathBuf,
}
