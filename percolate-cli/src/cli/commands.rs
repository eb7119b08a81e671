//! Command implementations and argument parsing for the percolate CLI.

use std::fs::{self, File};
use std::io::{self, BufRead, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use percolate_core::{
    DEFAULT_MEAN_DEGREE, DEFAULT_NODE_COUNT, DEFAULT_SEED, DEFAULT_SWEEP_STEP, ExperimentBuilder,
    PercolationError, Sweep, ThresholdAssigner, TrialOutcome,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::output::{compact, output_file_name, write_trial_row};

const DEFAULT_OUTPUT_DIR: &str = "./data";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "percolate",
    about = "Sweep heterogeneous k-core percolation on Erdős–Rényi graphs."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build a substrate and sweep the occupation probability.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// k-core threshold assigned with probability `--frac-thresh1`.
    #[arg(long, required_unless_present = "params_from_stdin")]
    pub threshold1: Option<usize>,

    /// Fraction of nodes receiving `--threshold1`.
    #[arg(long = "frac-thresh1", required_unless_present = "params_from_stdin")]
    pub frac_thresh1: Option<f64>,

    /// k-core threshold assigned to the remaining nodes.
    #[arg(long, required_unless_present = "params_from_stdin")]
    pub threshold2: Option<usize>,

    /// Read `threshold1 frac_thresh1 threshold2` as whitespace-separated
    /// values from stdin instead.
    #[arg(
        long = "params-from-stdin",
        conflicts_with_all = ["threshold1", "frac_thresh1", "threshold2"],
    )]
    pub params_from_stdin: bool,

    /// Number of nodes in the substrate.
    #[arg(long, default_value_t = DEFAULT_NODE_COUNT)]
    pub nodes: usize,

    /// Mean degree of the substrate.
    #[arg(long = "mean-degree", default_value_t = DEFAULT_MEAN_DEGREE)]
    pub mean_degree: f64,

    /// Seed for the pseudo-random generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Decrement between successive occupation probabilities.
    #[arg(long, default_value_t = DEFAULT_SWEEP_STEP)]
    pub step: f64,

    /// Smallest occupation probability (defaults to `1 / mean-degree`).
    #[arg(long)]
    pub stop: Option<f64>,

    /// Directory receiving the result file.
    #[arg(long = "output-dir", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Verify adjacency invariants after construction and every trial.
    #[arg(long = "check-invariants")]
    pub check_invariants: bool,
}

/// The three values the sweep is parameterised by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdParameters {
    /// First k-core threshold.
    pub threshold1: usize,
    /// Probability of drawing the first threshold.
    pub frac_thresh1: f64,
    /// Second k-core threshold.
    pub threshold2: usize,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading parameters from stdin failed.
    #[error("failed to read parameters from stdin: {source}")]
    ReadParameters {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A required parameter was not supplied.
    #[error("missing parameter `{name}`")]
    MissingParameter {
        /// Parameter name.
        name: &'static str,
    },
    /// A parameter could not be parsed.
    #[error("invalid value `{raw}` for `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Text supplied.
        raw: String,
        /// Parser message.
        reason: String,
    },
    /// Creating or writing the result file failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Core construction or percolation failed.
    #[error(transparent)]
    Core(#[from] PercolationError),
}

impl CliError {
    /// Returns the core error, if this error wraps one.
    #[must_use]
    pub fn core(&self) -> Option<&PercolationError> {
        match self {
            Self::Core(err) => Some(err),
            _ => None,
        }
    }
}

/// Summarises a completed sweep.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Threshold parameters the sweep ran with.
    pub parameters: ThresholdParameters,
    /// Number of nodes in the substrate.
    pub nodes: usize,
    /// Configured mean degree.
    pub mean_degree: f64,
    /// Edges placed in the substrate.
    pub edges: usize,
    /// Nodes that received the first threshold.
    pub first_threshold_nodes: usize,
    /// Number of trials written.
    pub trials: usize,
    /// Outcome of the last trial, at the smallest occupation probability.
    pub last_trial: Option<TrialOutcome>,
    /// Result file written by the sweep.
    pub output_path: PathBuf,
}

/// Executes the CLI command represented by `cli`, reading stdin when
/// `--params-from-stdin` is set.
///
/// # Errors
/// Returns [`CliError`] when parameters are missing or malformed, the
/// result file cannot be written, or the sweep fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use percolate_cli::cli::{Cli, Command, RunCommand, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         threshold1: Some(3),
///         frac_thresh1: Some(0.5),
///         threshold2: Some(2),
///         params_from_stdin: false,
///         nodes: 100,
///         mean_degree: 4.0,
///         seed: 1,
///         step: 0.25,
///         stop: Some(0.5),
///         output_dir: dir.path().to_path_buf(),
///         check_invariants: true,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.trials, 3);
/// assert!(summary.output_path.exists());
/// # Ok(())
/// # }
/// ```
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let stdin = io::stdin();
    run_cli_with_input(cli, stdin.lock())
}

/// Executes `cli`, reading `--params-from-stdin` values from `input`.
///
/// # Errors
/// See [`run_cli`].
#[instrument(
    name = "cli.run",
    err,
    skip(cli, input),
    fields(command = field::Empty),
)]
pub fn run_cli_with_input(cli: Cli, input: impl BufRead) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            let parameters = resolve_parameters(&run, input)?;
            run_command(&run, parameters)
        }
    }
}

pub(super) fn resolve_parameters(
    run: &RunCommand,
    input: impl BufRead,
) -> Result<ThresholdParameters, CliError> {
    if run.params_from_stdin {
        return parse_parameters(input);
    }
    Ok(ThresholdParameters {
        threshold1: run
            .threshold1
            .ok_or(CliError::MissingParameter { name: "threshold1" })?,
        frac_thresh1: run
            .frac_thresh1
            .ok_or(CliError::MissingParameter { name: "frac_thresh1" })?,
        threshold2: run
            .threshold2
            .ok_or(CliError::MissingParameter { name: "threshold2" })?,
    })
}

/// Parses `threshold1 frac_thresh1 threshold2` from whitespace-separated
/// text. Anything after the third value is ignored.
///
/// # Errors
/// Returns [`CliError::ReadParameters`] when reading fails,
/// [`CliError::MissingParameter`] when fewer than three values are present,
/// and [`CliError::InvalidParameter`] when a value does not parse.
///
/// # Examples
/// ```
/// use percolate_cli::cli::parse_parameters;
///
/// let params = parse_parameters("3 0.25\n2\n".as_bytes())?;
/// assert_eq!(params.threshold1, 3);
/// assert_eq!(params.frac_thresh1, 0.25);
/// assert_eq!(params.threshold2, 2);
/// # Ok::<(), percolate_cli::cli::CliError>(())
/// ```
pub fn parse_parameters(mut input: impl Read) -> Result<ThresholdParameters, CliError> {
    let mut raw = String::new();
    input
        .read_to_string(&mut raw)
        .map_err(|source| CliError::ReadParameters { source })?;
    let mut tokens = raw.split_whitespace();
    let mut next = |name: &'static str| tokens.next().ok_or(CliError::MissingParameter { name });

    let threshold1 = parse_token(next("threshold1")?, "threshold1")?;
    let frac_thresh1 = parse_token(next("frac_thresh1")?, "frac_thresh1")?;
    let threshold2 = parse_token(next("threshold2")?, "threshold2")?;
    Ok(ThresholdParameters {
        threshold1,
        frac_thresh1,
        threshold2,
    })
}

fn parse_token<T>(raw: &str, name: &'static str) -> Result<T, CliError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|err: T::Err| CliError::InvalidParameter {
        name,
        raw: raw.to_owned(),
        reason: err.to_string(),
    })
}

#[instrument(
    name = "cli.execute",
    err,
    skip(run, parameters),
    fields(nodes = run.nodes, mean_degree = run.mean_degree, seed = run.seed, output = field::Empty),
)]
pub(super) fn run_command(
    run: &RunCommand,
    parameters: ThresholdParameters,
) -> Result<ExecutionSummary, CliError> {
    let thresholds = ThresholdAssigner::new(
        parameters.threshold1,
        parameters.frac_thresh1,
        parameters.threshold2,
    )?;
    let stop = run.stop.unwrap_or(1.0 / run.mean_degree);
    let sweep = Sweep::new(1.0, run.step, stop)?;

    let output_path = run
        .output_dir
        .join(output_file_name(&parameters, run.nodes, run.mean_degree));
    Span::current().record("output", field::display(output_path.display()));
    info!(
        nodes = run.nodes,
        mean_degree = run.mean_degree,
        threshold1 = parameters.threshold1,
        threshold2 = parameters.threshold2,
        frac_thresh1 = parameters.frac_thresh1,
        output = %output_path.display(),
        "starting sweep"
    );

    let mut experiment = ExperimentBuilder::new()
        .with_node_count(run.nodes)
        .with_mean_degree(run.mean_degree)
        .with_thresholds(thresholds)
        .with_seed(run.seed)
        .with_sweep(sweep)
        .with_invariant_checks(run.check_invariants)
        .build()?;

    let mut writer = create_output(&run.output_dir, &output_path)?;
    let mut last_trial = None;
    let trials = experiment.run_sweep_with(|outcome| {
        write_trial_row(outcome, &mut writer).map_err(|source| io_error(&output_path, source))?;
        last_trial = Some(*outcome);
        Ok::<(), CliError>(())
    })?;
    writer
        .flush()
        .map_err(|source| io_error(&output_path, source))?;

    info!(trials, output = %output_path.display(), "sweep completed");
    Ok(ExecutionSummary {
        parameters,
        nodes: run.nodes,
        mean_degree: run.mean_degree,
        edges: experiment.edge_count(),
        first_threshold_nodes: experiment.first_threshold_nodes(),
        trials,
        last_trial,
        output_path,
    })
}

fn create_output(dir: &Path, path: &Path) -> Result<BufWriter<File>, CliError> {
    fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    Ok(BufWriter::new(file))
}

fn io_error(path: &Path, source: io::Error) -> CliError {
    CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Renders `summary` to `writer` as a short human-readable report.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let params = &summary.parameters;
    writeln!(writer, "nodes: {}", summary.nodes)?;
    writeln!(writer, "mean degree: {}", compact(summary.mean_degree))?;
    writeln!(writer, "edges: {}", summary.edges)?;
    writeln!(
        writer,
        "k-core thresholds: {} {}",
        params.threshold1, params.threshold2
    )?;
    writeln!(
        writer,
        "fraction with threshold1: {} ({} nodes)",
        compact(params.frac_thresh1),
        summary.first_threshold_nodes
    )?;
    writeln!(writer, "trials: {}", summary.trials)?;
    if let Some(last) = &summary.last_trial {
        writeln!(
            writer,
            "final giant fraction: {} at p = {}",
            compact(last.giant_fraction),
            compact(last.occupation)
        )?;
    }
    writeln!(writer, "data written to {}", summary.output_path.display())?;
    Ok(())
}
