//! Linear least-squares solver for the damped Levenberg–Marquardt step.
//!
//! Each solver iteration needs the minimizer of
//!
//! ```text
//! minimize ||J δ + r||^2 + λ ||D δ||^2
//! ```
//!
//! which we pose as one ordinary least-squares problem on the augmented
//! system `[J; √λ·D] δ = [-r; 0]` and solve by SVD.
//!
//! Implementation choices:
//! - SVD handles the tall, occasionally ill-conditioned systems that show up
//!   when a transition width collapses and two Jacobian columns become nearly
//!   collinear. (Nalgebra's `QR::solve` is intended for square systems.)
//! - The parameter dimension is tiny (4 columns), so SVD cost is negligible
//!   next to residual evaluation.
//! - We try progressively looser singular-value tolerances before giving up.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(sol) = svd.solve(y, tol) {
            if sol.iter().all(|v| v.is_finite()) {
                return Some(sol);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn damped_augmented_system_shrinks_the_step() {
        // minimize ||J δ + r||² + λ||δ||² with J = I: δ = -r / (1 + λ).
        let lambda: f64 = 4.0;
        let mut aug = DMatrix::zeros(4, 2);
        aug[(0, 0)] = 1.0;
        aug[(1, 1)] = 1.0;
        aug[(2, 0)] = lambda.sqrt();
        aug[(3, 1)] = lambda.sqrt();
        let rhs = DVector::from_row_slice(&[-1.0, -2.0, 0.0, 0.0]);

        let delta = solve_least_squares(&aug, &rhs).unwrap();
        assert!((delta[0] - (-0.2)).abs() < 1e-12);
        assert!((delta[1] - (-0.4)).abs() < 1e-12);
    }
}
