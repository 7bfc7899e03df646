//! CSV ingest and normalization.
//!
//! Turns an acquisition-tool CSV into a clean `RtSeries` that is safe to
//! fit.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no fitting logic here
//!
//! The RT schema is the two-column `T,R` file the acquisition pipeline
//! writes per bias channel; column matching is case-insensitive and accepts
//! the long spellings. Pulse records are headerless, one record per row.

use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::RtSeries;
use crate::error::AppError;

/// Summary stats about the points actually used for fitting.
#[derive(Debug, Clone)]
pub struct SeriesStats {
    pub n_points: usize,
    pub temp_min: f64,
    pub temp_max: f64,
    pub r_min: f64,
    pub r_max: f64,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the series + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedSeries {
    pub series: RtSeries,
    pub stats: SeriesStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load an RT CSV (`T,R` schema).
pub fn load_rt_series(path: &Path) -> Result<IngestedSeries, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let t_idx = find_column(&headers, &["t", "temp", "temperature"]).ok_or_else(|| {
        AppError::new(2, "Missing temperature column (expected 'T' or 'temperature').")
    })?;
    let r_idx = find_column(&headers, &["r", "res", "resistance"]).ok_or_else(|| {
        AppError::new(2, "Missing resistance column (expected 'R' or 'resistance').")
    })?;

    let mut temperature = Vec::new();
    let mut resistance = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, record) in reader.records().enumerate() {
        rows_read += 1;
        let line = idx + 2; // header occupies line 1

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("Unreadable row: {e}"),
                });
                continue;
            }
        };

        match (parse_field(&record, t_idx), parse_field(&record, r_idx)) {
            (Some(t), Some(r)) => {
                temperature.push(t);
                resistance.push(r);
            }
            _ => row_errors.push(RowError {
                line,
                message: "Row is missing a finite T or R value.".to_string(),
            }),
        }
    }

    let rows_used = temperature.len();
    if rows_used == 0 {
        return Err(AppError::new(
            3,
            format!("No usable rows in '{}'.", path.display()),
        ));
    }

    let stats = SeriesStats {
        n_points: rows_used,
        temp_min: fold_min(&temperature),
        temp_max: fold_max(&temperature),
        r_min: fold_min(&resistance),
        r_max: fold_max(&resistance),
    };

    Ok(IngestedSeries {
        series: RtSeries {
            temperature,
            resistance,
        },
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Load headerless pulse records, one record per row.
///
/// Unlike RT ingest, a malformed field here fails the whole load: silently
/// dropping samples from the middle of a trace would corrupt every
/// downstream timing measurement.
pub fn load_pulse_records(path: &Path) -> Result<Vec<Vec<f64>>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let line = idx + 1;
        let record =
            record.map_err(|e| AppError::new(2, format!("Unreadable row {line}: {e}")))?;

        let mut samples = Vec::with_capacity(record.len());
        for field in record.iter() {
            if field.is_empty() {
                continue;
            }
            let v: f64 = field.parse().map_err(|_| {
                AppError::new(2, format!("Row {line}: '{field}' is not a number."))
            })?;
            samples.push(v);
        }
        if !samples.is_empty() {
            records.push(samples);
        }
    }

    if records.is_empty() {
        return Err(AppError::new(
            3,
            format!("No pulse records in '{}'.", path.display()),
        ));
    }
    Ok(records)
}

fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.contains(&h.to_ascii_lowercase().as_str()))
}

fn parse_field(record: &StringRecord, idx: usize) -> Option<f64> {
    record
        .get(idx)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn fold_min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn fold_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_a_standard_rt_csv() {
        let path = write_temp(
            "tescal_ingest_ok.csv",
            "T,R\n180,0.001\n190,0.5\n200,7.5\n210,14.5\n220,15.0\n",
        );
        let ingested = load_rt_series(&path).unwrap();
        assert_eq!(ingested.rows_used, 5);
        assert!(ingested.row_errors.is_empty());
        assert_eq!(ingested.stats.temp_min, 180.0);
        assert_eq!(ingested.stats.temp_max, 220.0);
        assert_eq!(ingested.stats.r_max, 15.0);
    }

    #[test]
    fn header_matching_is_case_insensitive() {
        let path = write_temp(
            "tescal_ingest_headers.csv",
            "Temperature,Resistance\n180,0.0\n200,7.5\n220,15.0\n",
        );
        let ingested = load_rt_series(&path).unwrap();
        assert_eq!(ingested.rows_used, 3);
    }

    #[test]
    fn bad_rows_are_reported_with_line_numbers() {
        let path = write_temp(
            "tescal_ingest_bad_rows.csv",
            "T,R\n180,0.001\nnot_a_number,0.5\n200,\n210,14.5\n",
        );
        let ingested = load_rt_series(&path).unwrap();
        assert_eq!(ingested.rows_used, 2);
        assert_eq!(ingested.row_errors.len(), 2);
        assert_eq!(ingested.row_errors[0].line, 3);
        assert_eq!(ingested.row_errors[1].line, 4);
    }

    #[test]
    fn missing_schema_columns_fail_fast() {
        let path = write_temp("tescal_ingest_schema.csv", "x,y\n1,2\n");
        assert_eq!(load_rt_series(&path).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn pulse_records_load_row_per_record() {
        let path = write_temp(
            "tescal_ingest_pulses.csv",
            "0.0,0.1,0.9,0.5\n0.0,0.2,1.1,0.6\n",
        );
        let records = load_pulse_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], vec![0.0, 0.1, 0.9, 0.5]);
    }

    #[test]
    fn malformed_pulse_sample_fails_the_load() {
        let path = write_temp("tescal_ingest_pulses_bad.csv", "0.0,oops,0.9\n");
        assert_eq!(load_pulse_records(&path).unwrap_err().exit_code(), 2);
    }
}
