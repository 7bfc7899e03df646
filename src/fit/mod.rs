//! Transition-curve fitting.
//!
//! Responsibilities:
//!
//! - derive bound intervals from the series (boundary-sample policy)
//! - minimize squared residuals in unconstrained space (Levenberg–Marquardt)
//! - reparameterize the converged vector into physical values

pub mod bounds;
pub mod fitter;
pub mod solver;

pub use fitter::*;
pub use solver::*;
