//! Terminal formatting for fit and filter runs.

use std::fmt::Write;

use crate::domain::{FilterDesign, Interval, TransitionFit};
use crate::io::ingest::IngestedSeries;
use crate::report::{PointResidual, TransitionDiagnostics};

/// Format the summary block for one `tescal fit` run.
pub fn format_fit_summary(
    ingest: &IngestedSeries,
    fit: &TransitionFit,
    residuals: &[PointResidual],
    diagnostics: Option<&TransitionDiagnostics>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "RT transition fit");
    let _ = writeln!(
        out,
        "  data: {} points, T {:.3}..{:.3} mK, R {:.4}..{:.4} mOhm",
        ingest.stats.n_points,
        ingest.stats.temp_min,
        ingest.stats.temp_max,
        ingest.stats.r_min,
        ingest.stats.r_max,
    );
    if !ingest.row_errors.is_empty() {
        let _ = writeln!(
            out,
            "  skipped {} of {} rows (first: line {}: {})",
            ingest.row_errors.len(),
            ingest.rows_read,
            ingest.row_errors[0].line,
            ingest.row_errors[0].message,
        );
    }

    let status = if fit.converged { "converged" } else { "NOT converged (best effort)" };
    let _ = writeln!(out, "  solver: {status} after {} iterations", fit.iterations);

    let _ = writeln!(out, "  parameters (physical <- bounds):");
    let _ = writeln!(out, "    RN = {:9.4} mOhm   {}", fit.params.rn, fmt_interval(&fit.bounds.rn));
    let _ = writeln!(out, "    Tc = {:9.4} mK     {}", fit.params.tc, fmt_interval(&fit.bounds.tc));
    let _ = writeln!(out, "    T1 = {:9.4} mK     {}", fit.params.t1, fmt_interval(&fit.bounds.t1));
    let _ = writeln!(out, "    T2 = {:9.4} mK     {}", fit.params.t2, fmt_interval(&fit.bounds.t2));
    let _ = writeln!(
        out,
        "  raw vector: [{:.6}, {:.6}, {:.6}, {:.6}]",
        fit.raw[0], fit.raw[1], fit.raw[2], fit.raw[3]
    );

    let max_abs = residuals
        .iter()
        .map(|p| p.residual.abs())
        .fold(0.0_f64, f64::max);
    let _ = writeln!(
        out,
        "  quality: sse {:.6e}, rmse {:.6e}, max |residual| {:.6e}",
        fit.quality.sse, fit.quality.rmse, max_abs
    );

    match diagnostics {
        Some(diag) => {
            let (lo, hi) = diag.window;
            let _ = writeln!(
                out,
                "  bias window (10-90% RN): {:.3}..{:.3} mK ({:.3} mK wide)",
                lo,
                hi,
                hi - lo
            );
            let _ = writeln!(
                out,
                "  peak alpha: {:.1} at {:.3} mK ({:.0}% RN)",
                diag.peak.alpha, diag.peak.temperature, diag.peak.bias_pct
            );
        }
        None => {
            let _ = writeln!(out, "  bias window did not resolve inside the sweep");
        }
    }

    out
}

/// Format the summary block for one `tescal filter` run.
pub fn format_filter_summary(rate: f64, fs: f64, ws: f64, design: &FilterDesign) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Bessel low-pass design (order 2)");
    let _ = writeln!(out, "  rate {rate}, fs {fs} -> normalized cutoff {ws}");
    let _ = writeln!(
        out,
        "  b = [{:.12}, {:.12}, {:.12}]",
        design.b[0], design.b[1], design.b[2]
    );
    let _ = writeln!(
        out,
        "  a = [{:.12}, {:.12}, {:.12}]",
        design.a[0], design.a[1], design.a[2]
    );
    out
}

fn fmt_interval(interval: &Interval) -> String {
    format!("({:.4}, {:.4})", interval.lo, interval.hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{design_low_pass, normalized_cutoff};

    #[test]
    fn filter_summary_lists_both_coefficient_rows() {
        let design = design_low_pass(10.0, 1.0).unwrap();
        let text = format_filter_summary(10.0, 1.0, normalized_cutoff(10.0, 1.0), &design);
        assert!(text.contains("b = ["));
        assert!(text.contains("a = ["));
        assert!(text.contains("0.2"));
    }
}
