//! Readout filter design and application.

pub mod bessel;
pub mod zero_phase;

pub use bessel::*;
pub use zero_phase::*;
