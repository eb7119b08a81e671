//! Result-file naming and row formatting.

use std::io::{self, Write};

use percolate_core::TrialOutcome;

use super::commands::ThresholdParameters;

/// Formats `value` with at most six decimal places, dropping trailing
/// zeros, so `0.0050000000000000044` renders as `0.005` and `10.0` as `10`.
pub(super) fn compact(value: f64) -> String {
    let fixed = format!("{value:.6}");
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    match trimmed {
        "-0" => "0".to_owned(),
        other => other.to_owned(),
    }
}

/// Returns the result-file name for a run.
///
/// # Examples
/// ```
/// use percolate_cli::cli::{ThresholdParameters, output_file_name};
///
/// let params = ThresholdParameters {
///     threshold1: 3,
///     frac_thresh1: 0.5,
///     threshold2: 2,
/// };
/// assert_eq!(
///     output_file_name(&params, 1_000_000, 10.0),
///     "GCvsprobNn1000000avgdeg_10L1_3r_0.5L2_2.dat",
/// );
/// ```
#[must_use]
pub fn output_file_name(params: &ThresholdParameters, nodes: usize, mean_degree: f64) -> String {
    format!(
        "GCvsprobNn{nodes}avgdeg_{}L1_{}r_{}L2_{}.dat",
        compact(mean_degree),
        params.threshold1,
        compact(params.frac_thresh1),
        params.threshold2,
    )
}

/// Writes one result row: attacked share `1 - p`, giant-component
/// fraction, and pruning passes, separated by two spaces.
///
/// # Errors
/// Returns [`io::Error`] if writing fails.
pub fn write_trial_row(outcome: &TrialOutcome, mut writer: impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "{}  {}  {}",
        compact(1.0 - outcome.occupation),
        compact(outcome.giant_fraction),
        outcome.prune_passes,
    )
}
