//! Dense Levenberg–Marquardt minimization.
//!
//! Minimizes `||r(p)||²` for a black-box residual function by damped
//! Gauss–Newton iteration:
//!
//! - forward-difference Jacobian (step `√ε·max(|p_j|, 1)`)
//! - Marquardt column scaling, so damping is invariant to parameter units
//! - each damped step solved as the augmented least-squares system
//!   `[J; √λ·D]·δ = [-r; 0]` via `math::solve_least_squares`
//! - accept/reject with a λ×10 / λ×0.1 schedule
//!
//! Termination is deliberately explicit in the outcome: `converged` reports
//! whether a stopping criterion fired (small step or small gradient), and a
//! run that exhausts `max_iters` still returns the best parameters seen
//! rather than failing. Only non-finite residuals at the starting point are
//! an error; a non-finite trial is treated as a rejected step.

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;
use crate::math::solve_least_squares;

/// Damping ceiling; past this the step is numerically zero anyway.
const MAX_LAMBDA: f64 = 1e12;

/// Solver knobs. The defaults are sized for small calibration problems
/// (a handful of parameters, tens of observations).
#[derive(Debug, Clone)]
pub struct SolverOptions {
    pub max_iters: usize,
    /// Relative step-size tolerance for declaring convergence.
    pub tolerance: f64,
    /// Relative objective-improvement tolerance; accepted steps that barely
    /// move the objective terminate the iteration.
    pub ftol: f64,
    pub lambda_init: f64,
    pub lambda_up: f64,
    pub lambda_down: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iters: 200,
            tolerance: 1e-8,
            ftol: 1e-10,
            lambda_init: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
        }
    }
}

/// Outcome of a minimization run.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub params: DVector<f64>,
    pub sse: f64,
    pub converged: bool,
    pub iterations: usize,
}

/// Minimize the sum of squared residuals starting from `initial`.
pub fn minimize<F>(
    residual_fn: F,
    initial: DVector<f64>,
    opts: &SolverOptions,
) -> Result<SolveOutcome, AppError>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let mut params = initial;
    let p = params.len();

    let mut r = residual_fn(&params);
    if !r.iter().all(|v| v.is_finite()) {
        return Err(AppError::new(
            4,
            "Non-finite residuals at the starting point.",
        ));
    }
    let n = r.len();
    let mut sse = r.norm_squared();

    let mut lambda = opts.lambda_init;
    let mut converged = false;
    let mut iterations = 0;

    for iter in 0..opts.max_iters {
        iterations = iter + 1;

        let jac = forward_jacobian(&residual_fn, &params, &r);
        if !jac.iter().all(|v| v.is_finite()) {
            return Err(AppError::new(
                4,
                "Non-finite Jacobian; residual model is unstable at the current point.",
            ));
        }

        let gradient_norm = jac.tr_mul(&r).norm();

        // Column norms make λ dimensionless across parameters.
        let mut scale = DVector::zeros(p);
        for j in 0..p {
            scale[j] = jac.column(j).norm().max(1e-12);
        }

        // Inner damping loop: raise λ until a step reduces the objective.
        let mut stepped = false;
        while lambda <= MAX_LAMBDA {
            let mut aug = DMatrix::zeros(n + p, p);
            aug.view_mut((0, 0), (n, p)).copy_from(&jac);
            for j in 0..p {
                aug[(n + j, j)] = lambda.sqrt() * scale[j];
            }
            let mut rhs = DVector::zeros(n + p);
            rhs.rows_mut(0, n).copy_from(&(-&r));

            let Some(delta) = solve_least_squares(&aug, &rhs) else {
                lambda *= opts.lambda_up;
                continue;
            };

            let trial = &params + &delta;
            let r_trial = residual_fn(&trial);
            let sse_trial = if r_trial.iter().all(|v| v.is_finite()) {
                r_trial.norm_squared()
            } else {
                f64::INFINITY
            };

            if sse_trial < sse {
                let step_norm = delta.norm();
                let improvement = sse - sse_trial;
                params = trial;
                r = r_trial;
                sse = sse_trial;
                lambda = (lambda * opts.lambda_down).max(1e-12);
                stepped = true;
                if step_norm < opts.tolerance * (params.norm() + opts.tolerance)
                    || improvement <= opts.ftol * sse
                {
                    converged = true;
                }
                break;
            }
            lambda *= opts.lambda_up;
        }

        if converged {
            break;
        }
        if !stepped {
            // No damping level produced an improvement: either a local
            // minimum (flat gradient) or a stall the caller should see.
            converged = gradient_norm < 1e-8 * (1.0 + sse);
            break;
        }
    }

    Ok(SolveOutcome {
        params,
        sse,
        converged,
        iterations,
    })
}

/// Forward-difference Jacobian of the residual function.
fn forward_jacobian<F>(f: &F, params: &DVector<f64>, r0: &DVector<f64>) -> DMatrix<f64>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let n = r0.len();
    let p = params.len();
    let eps = f64::EPSILON.sqrt();

    let mut jac = DMatrix::zeros(n, p);
    let mut perturbed = params.clone();
    for j in 0..p {
        let h = eps * params[j].abs().max(1.0);
        perturbed[j] = params[j] + h;
        let rj = f(&perturbed);
        perturbed[j] = params[j];
        for i in 0..n {
            jac[(i, j)] = (rj[i] - r0[i]) / h;
        }
    }
    jac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_a_linear_model() {
        // Fit y = a·x + b to exact data from a=2, b=1.
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();

        let residual = move |p: &DVector<f64>| {
            DVector::from_iterator(
                xs.len(),
                xs.iter().zip(&ys).map(|(x, y)| y - (p[0] * x + p[1])),
            )
        };

        let out = minimize(
            residual,
            DVector::from_row_slice(&[0.0, 0.0]),
            &SolverOptions::default(),
        )
        .unwrap();

        assert!(out.converged);
        assert!((out.params[0] - 2.0).abs() < 1e-8);
        assert!((out.params[1] - 1.0).abs() < 1e-8);
        assert!(out.sse < 1e-16);
    }

    #[test]
    fn recovers_an_exponential_decay() {
        // y = c·exp(-k·x), a genuinely nonlinear problem.
        let xs: Vec<f64> = (0..10).map(|i| i as f64 * 0.5).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * (-0.7 * x).exp()).collect();
        let data: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();

        let residual = move |p: &DVector<f64>| {
            DVector::from_iterator(
                data.len(),
                data.iter().map(|(x, y)| y - p[0] * (-p[1] * x).exp()),
            )
        };

        let out = minimize(
            residual,
            DVector::from_row_slice(&[1.0, 0.1]),
            &SolverOptions::default(),
        )
        .unwrap();

        assert!(out.converged);
        assert!((out.params[0] - 3.0).abs() < 1e-6);
        assert!((out.params[1] - 0.7).abs() < 1e-6);
    }

    #[test]
    fn iteration_budget_returns_best_effort() {
        let residual = |p: &DVector<f64>| {
            DVector::from_row_slice(&[(p[0] - 5.0) * (p[0] - 5.0) + 1.0, p[0].sin()])
        };
        let opts = SolverOptions {
            max_iters: 1,
            ..SolverOptions::default()
        };
        let out = minimize(residual, DVector::from_row_slice(&[0.0]), &opts).unwrap();
        assert_eq!(out.iterations, 1);
        assert!(out.params[0].is_finite());
    }

    #[test]
    fn non_finite_start_is_an_error() {
        let residual = |_: &DVector<f64>| DVector::from_row_slice(&[f64::NAN]);
        let err = minimize(
            residual,
            DVector::from_row_slice(&[0.0]),
            &SolverOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
