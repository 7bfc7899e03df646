//! Write fit/filter JSON files and CSV outputs.
//!
//! The fit JSON is the portable representation of one calibration: raw and
//! physical parameters, the bound intervals they were squashed through, fit
//! quality, and a precomputed fitted grid for quick plotting. The schema is
//! defined by `domain::FitFile` / `domain::FilterFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{CurveGrid, FilterDesign, FilterFile, FitFile, RtSeries, TransitionFit};
use crate::error::AppError;
use crate::filter::normalized_cutoff;
use crate::model;

/// Margin (mK) added on both sides of the measured range when sampling the
/// fitted curve, so the plot shows the saturated tails.
const GRID_MARGIN: f64 = 2.0;

/// Write a fit JSON file.
pub fn write_fit_json(
    path: &Path,
    fit: &TransitionFit,
    series: &RtSeries,
    grid_points: usize,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create fit JSON '{}': {e}", path.display()))
    })?;

    let t0 = series.temperature[0] - GRID_MARGIN;
    let t1 = series.temperature[series.len() - 1] + GRID_MARGIN;
    let fit_file = FitFile {
        tool: "tescal".to_string(),
        fit: fit.clone(),
        grid: build_grid(fit, t0, t1, grid_points),
    };

    serde_json::to_writer_pretty(file, &fit_file)
        .map_err(|e| AppError::new(2, format!("Failed to write fit JSON: {e}")))?;
    Ok(())
}

/// Write a filter JSON file.
pub fn write_filter_json(
    path: &Path,
    rate: f64,
    fs: f64,
    design: &FilterDesign,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create filter JSON '{}': {e}", path.display()))
    })?;

    let filter_file = FilterFile {
        tool: "tescal".to_string(),
        rate,
        fs,
        normalized_cutoff: normalized_cutoff(rate, fs),
        design: *design,
    };

    serde_json::to_writer_pretty(file, &filter_file)
        .map_err(|e| AppError::new(2, format!("Failed to write filter JSON: {e}")))?;
    Ok(())
}

/// Write an RT series as a `T,R` CSV (the acquisition-tool schema).
pub fn write_series_csv(path: &Path, series: &RtSeries) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display()))
    })?;

    writer
        .write_record(["T", "R"])
        .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;
    for (t, r) in series.temperature.iter().zip(&series.resistance) {
        writer
            .write_record([t.to_string(), r.to_string()])
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

/// Write headerless pulse records, one record per row.
pub fn write_pulse_records(path: &Path, records: &[Vec<f64>]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display()))
    })?;

    for record in records {
        let fields: Vec<String> = record.iter().map(|v| v.to_string()).collect();
        writer
            .write_record(&fields)
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

fn build_grid(fit: &TransitionFit, t0: f64, t1: f64, n: usize) -> CurveGrid {
    let n = n.max(2);
    let mut temperature = Vec::with_capacity(n);
    let mut resistance = Vec::with_capacity(n);

    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let t = t0 + u * (t1 - t0);
        temperature.push(t);
        resistance.push(model::predict(&fit.params, t));
    }

    CurveGrid {
        temperature,
        resistance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_sample;
    use crate::domain::{SampleSpec, TransitionParams};
    use crate::filter::design_low_pass;
    use crate::fit::{fit_transition, FitOptions};
    use crate::io::ingest::{load_pulse_records, load_rt_series};

    fn sample_series() -> RtSeries {
        generate_sample(&SampleSpec {
            params: TransitionParams {
                rn: 15.0,
                tc: 200.0,
                t1: 2.0,
                t2: 2.0,
            },
            temp_min: 180.0,
            temp_max: 220.0,
            count: 21,
            noise_sigma: 0.0,
            seed: 1,
        })
        .unwrap()
    }

    #[test]
    fn fit_json_round_trips_through_serde() {
        let series = sample_series();
        let fit = fit_transition(&series, &FitOptions::default()).unwrap();

        let path = std::env::temp_dir().join("tescal_export_fit.json");
        write_fit_json(&path, &fit, &series, 51).unwrap();

        let loaded: FitFile =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(loaded.tool, "tescal");
        assert_eq!(loaded.fit.raw, fit.raw);
        assert_eq!(loaded.grid.temperature.len(), 51);
        assert_eq!(loaded.grid.temperature[0], 178.0);
        assert_eq!(loaded.grid.temperature[50], 222.0);
    }

    #[test]
    fn series_csv_round_trips_through_ingest() {
        let series = sample_series();
        let path = std::env::temp_dir().join("tescal_export_series.csv");
        write_series_csv(&path, &series).unwrap();

        let ingested = load_rt_series(&path).unwrap();
        assert_eq!(ingested.series.temperature, series.temperature);
        assert_eq!(ingested.series.resistance, series.resistance);
    }

    #[test]
    fn pulse_records_round_trip() {
        let records = vec![vec![0.0, 0.5, 1.0], vec![1.0, 0.5, 0.0]];
        let path = std::env::temp_dir().join("tescal_export_pulses.csv");
        write_pulse_records(&path, &records).unwrap();
        assert_eq!(load_pulse_records(&path).unwrap(), records);
    }

    #[test]
    fn filter_json_records_the_design_inputs() {
        let design = design_low_pass(10.0, 1.0).unwrap();
        let path = std::env::temp_dir().join("tescal_export_filter.json");
        write_filter_json(&path, 10.0, 1.0, &design).unwrap();

        let loaded: FilterFile =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(loaded.rate, 10.0);
        assert_eq!(loaded.normalized_cutoff, 0.2);
        assert_eq!(loaded.design.b, design.b);
    }
}
