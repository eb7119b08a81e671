//! Command-line interface for running percolation sweeps.
//!
//! The `run` command builds an Erdős–Rényi substrate with a two-valued
//! k-core threshold mix, sweeps the occupation probability downward, and
//! streams one row per trial into a result file.

mod commands;
mod output;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, RunCommand, ThresholdParameters, parse_parameters,
    render_summary, run_cli, run_cli_with_input,
};
pub use output::{output_file_name, write_trial_row};
