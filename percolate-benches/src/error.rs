//! Benchmark setup error type.
//!
//! Lets setup functions propagate core failures with `?` instead of
//! calling `.expect()`.

use percolate_core::PercolationError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Substrate construction or a trial failed.
    #[error("percolation setup failed: {0}")]
    Percolation(#[from] PercolationError),
}
