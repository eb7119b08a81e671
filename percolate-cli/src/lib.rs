//! Support library for the percolate CLI binary.
//!
//! Exposes the command pipeline and logging set-up so doctests and
//! integration tests can drive a sweep without spawning a subprocess.

pub mod cli;
pub mod logging;
