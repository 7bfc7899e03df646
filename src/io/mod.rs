//! File input/output: RT CSV ingest, pulse-record CSV, JSON exports.

pub mod export;
pub mod ingest;
