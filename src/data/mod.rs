//! Synthetic measurement data.

pub mod sample;

pub use sample::*;
