//! Benchmark support crate for percolate.
//!
//! Provides prepared substrates and parameter types used by the Criterion
//! benchmarks for the three stages of a trial: substrate construction,
//! attack with k-core pruning, and giant-component search.

pub mod error;
pub mod params;
pub mod substrate;
