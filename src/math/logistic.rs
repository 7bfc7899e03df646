//! Stable logistic evaluation.
//!
//! The transition model is a product of logistic terms `1/(1+exp(-x))`. The
//! naive form overflows for large negative `x` (tiny characteristic widths
//! push the exponent argument to ±thousands), so we branch on the sign and
//! only ever exponentiate a non-positive argument:
//!
//! - `x >= 0`: `1 / (1 + exp(-x))`
//! - `x <  0`: `exp(x) / (1 + exp(x))`
//!
//! Both branches keep the intermediate `exp` in `(0, 1]`, so the result is
//! finite for every finite input and saturates cleanly to 0 or 1.

/// Compute `1/(1+exp(-x))` without overflow.
pub fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
