//! Numerical primitives shared by the fit pipeline.

pub mod logistic;
pub mod lstsq;

pub use logistic::logistic;
pub use lstsq::solve_least_squares;
