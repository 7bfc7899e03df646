//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the fit pipeline / filter design / sample generation
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, FilterArgs, FitArgs, SampleArgs};
use crate::domain::{FitRunConfig, SampleSpec, TransitionParams};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `tescal` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Filter(args) => handle_filter(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;

    println!(
        "{}",
        crate::report::format::format_fit_summary(
            &run.ingest,
            &run.fit,
            &run.residuals,
            run.diagnostics.as_ref(),
        )
    );

    if let Some(path) = &config.export_fit {
        crate::io::export::write_fit_json(path, &run.fit, &run.ingest.series, config.grid_points)?;
    }

    Ok(())
}

fn handle_filter(args: FilterArgs) -> Result<(), AppError> {
    let design = crate::filter::design_low_pass(args.rate, args.fs)?;
    let ws = crate::filter::normalized_cutoff(args.rate, args.fs);

    println!(
        "{}",
        crate::report::format::format_filter_summary(args.rate, args.fs, ws, &design)
    );

    if let Some(path) = &args.export {
        crate::io::export::write_filter_json(path, args.rate, args.fs, &design)?;
    }

    if let Some(input) = &args.apply {
        let out = args.out.as_ref().ok_or_else(|| {
            AppError::new(2, "--apply requires --out for the filtered records.")
        })?;
        let records = crate::io::ingest::load_pulse_records(input)?;
        let filtered = crate::filter::filtfilt_batch(&design, &records);
        crate::io::export::write_pulse_records(out, &filtered)?;
        println!(
            "filtered {} records ({} samples each, first record)",
            filtered.len(),
            filtered.first().map(Vec::len).unwrap_or(0)
        );
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let spec = SampleSpec {
        params: TransitionParams {
            rn: args.rn,
            tc: args.tc,
            t1: args.t1,
            t2: args.t2,
        },
        temp_min: args.temp_min,
        temp_max: args.temp_max,
        count: args.count,
        noise_sigma: args.noise,
        seed: args.seed,
    };

    let series = crate::data::generate_sample(&spec)?;
    crate::io::export::write_series_csv(&args.out, &series)?;
    println!(
        "wrote {} points to {} (seed {})",
        series.len(),
        args.out.display(),
        args.seed
    );
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> Result<FitRunConfig, AppError> {
    let initial = match &args.initial {
        None => None,
        Some(values) => {
            let raw: [f64; 4] = values.as_slice().try_into().map_err(|_| {
                AppError::new(2, "--initial expects exactly 4 values (RN TC T1 T2).")
            })?;
            Some(raw)
        }
    };

    Ok(FitRunConfig {
        csv_path: args.csv.clone(),
        max_iters: args.max_iters,
        tolerance: args.tol,
        initial,
        grid_points: args.grid_points,
        export_fit: args.export_fit.clone(),
    })
}
