//! Occupation-probability sweeps over a pristine substrate.
//!
//! An [`Experiment`] owns the pristine graph, a working copy, and the
//! uniform source. Each trial resets the working copy from the pristine
//! graph, attacks it, prunes it to its k-core, and measures the giant
//! component.

use tracing::{debug_span, error, info, instrument};

use crate::{
    cluster::ClusterFinder,
    error::{PercolationError, Result},
    graph::Graph,
    percolation::{prune_to_kcore, random_attack},
    rng::UniformSource,
    substrate::ThresholdAssigner,
};

/// Default decrement between successive occupation probabilities.
pub const DEFAULT_SWEEP_STEP: f64 = 0.005;

const SWEEP_TOLERANCE: f64 = 1e-9;

/// Descending schedule of occupation probabilities.
///
/// Probabilities are `start - k * step` for `k = 0, 1, ...` down to and
/// including `stop`. Each value is computed from its index, so long sweeps
/// do not accumulate rounding drift.
///
/// # Examples
/// ```
/// use percolate_core::Sweep;
///
/// let sweep = Sweep::new(1.0, 0.25, 0.5)?;
/// assert_eq!(sweep.probabilities().collect::<Vec<_>>(), vec![1.0, 0.75, 0.5]);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    start: f64,
    step: f64,
    stop: f64,
}

impl Sweep {
    /// Creates a schedule from `start` down to `stop` in decrements of `step`.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidSweep`] unless
    /// `0 < stop <= start <= 1` and `step` is positive and finite.
    pub fn new(start: f64, step: f64, stop: f64) -> Result<Self> {
        if !(start > 0.0 && start <= 1.0) {
            return Err(invalid_sweep(format!("start must lie in (0, 1] (got {start})")));
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(invalid_sweep(format!(
                "step must be positive and finite (got {step})"
            )));
        }
        if !(stop > 0.0 && stop <= start) {
            return Err(invalid_sweep(format!(
                "stop must lie in (0, {start}] (got {stop})"
            )));
        }
        Ok(Self { start, step, stop })
    }

    /// Returns the classic schedule for a substrate of the given mean
    /// degree: from `1.0` down to `1 / mean_degree` in steps of
    /// [`DEFAULT_SWEEP_STEP`].
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidSweep`] when `mean_degree < 1`,
    /// since the stopping point would exceed full occupation.
    pub fn for_mean_degree(mean_degree: f64) -> Result<Self> {
        if !(mean_degree.is_finite() && mean_degree >= 1.0) {
            return Err(invalid_sweep(format!(
                "mean degree must be at least 1 to derive a stopping point (got {mean_degree})"
            )));
        }
        Self::new(1.0, DEFAULT_SWEEP_STEP, 1.0 / mean_degree)
    }

    /// Returns the first (largest) occupation probability.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Returns the decrement between trials.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Returns the smallest occupation probability.
    #[must_use]
    pub fn stop(&self) -> f64 {
        self.stop
    }

    /// Returns the number of trials in the schedule. Always at least `1`.
    #[must_use]
    pub fn len(&self) -> usize {
        ((self.start - self.stop) / self.step + SWEEP_TOLERANCE).floor() as usize + 1
    }

    /// Always `false`; present for API symmetry with [`Sweep::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates the occupation probabilities in descending order.
    pub fn probabilities(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(|k| (self.start - k as f64 * self.step).max(self.stop))
    }
}

fn invalid_sweep(reason: String) -> PercolationError {
    PercolationError::InvalidSweep { reason }
}

/// Measurements from one attack-prune-measure trial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrialOutcome {
    /// Occupation probability `p` used for the attack.
    pub occupation: f64,
    /// Number of nodes selected by the attack.
    pub attacked_nodes: usize,
    /// `attacked_nodes / N`.
    pub attacked_fraction: f64,
    /// Size of the largest connected component after pruning.
    pub giant_component: usize,
    /// `giant_component / N`.
    pub giant_fraction: f64,
    /// Full pruning passes, including the final pass that removed nothing.
    pub prune_passes: usize,
    /// Nodes isolated by pruning.
    pub pruned_nodes: usize,
}

/// Pristine substrate plus the state needed to run trials against it.
///
/// Construct one with [`crate::ExperimentBuilder`].
#[derive(Debug)]
pub struct Experiment<S> {
    pristine: Graph,
    working: Graph,
    finder: ClusterFinder,
    source: S,
    sweep: Sweep,
    thresholds: ThresholdAssigner,
    mean_degree: f64,
    edge_count: usize,
    first_threshold_nodes: usize,
    check_invariants: bool,
}

/// Construction-time facts handed from the builder to [`Experiment`].
pub(crate) struct ExperimentParts<S> {
    pub(crate) pristine: Graph,
    pub(crate) source: S,
    pub(crate) sweep: Sweep,
    pub(crate) thresholds: ThresholdAssigner,
    pub(crate) mean_degree: f64,
    pub(crate) edge_count: usize,
    pub(crate) first_threshold_nodes: usize,
    pub(crate) check_invariants: bool,
}

impl<S: UniformSource> Experiment<S> {
    pub(crate) fn from_parts(parts: ExperimentParts<S>) -> Self {
        let working = parts.pristine.clone();
        Self {
            pristine: parts.pristine,
            working,
            finder: ClusterFinder::new(),
            source: parts.source,
            sweep: parts.sweep,
            thresholds: parts.thresholds,
            mean_degree: parts.mean_degree,
            edge_count: parts.edge_count,
            first_threshold_nodes: parts.first_threshold_nodes,
            check_invariants: parts.check_invariants,
        }
    }

    /// Returns the read-only substrate every trial starts from.
    #[must_use]
    pub fn pristine(&self) -> &Graph {
        &self.pristine
    }

    /// Returns the working graph as left by the most recent trial.
    #[must_use]
    pub fn working(&self) -> &Graph {
        &self.working
    }

    /// Returns the number of nodes in the substrate.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.pristine.len()
    }

    /// Returns the number of edges placed in the substrate.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns the configured mean degree.
    #[must_use]
    pub fn mean_degree(&self) -> f64 {
        self.mean_degree
    }

    /// Returns the threshold mix used for the substrate.
    #[must_use]
    pub fn thresholds(&self) -> &ThresholdAssigner {
        &self.thresholds
    }

    /// Returns how many nodes received the first threshold.
    #[must_use]
    pub fn first_threshold_nodes(&self) -> usize {
        self.first_threshold_nodes
    }

    /// Returns the occupation schedule followed by [`Experiment::run_sweep`].
    #[must_use]
    pub fn sweep(&self) -> &Sweep {
        &self.sweep
    }

    /// Runs one trial at `occupation` against a fresh copy of the pristine
    /// substrate.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidProbability`] for an occupation
    /// outside `(0, 1]` and propagates invariant violations. When invariant
    /// checks are enabled, the working graph is verified after pruning.
    #[instrument(name = "experiment.trial", err, skip(self))]
    pub fn run_trial(&mut self, occupation: f64) -> Result<TrialOutcome> {
        self.working.reset_from(&self.pristine);
        let attack = random_attack(&mut self.working, occupation, &mut self.source)?;
        let prune = prune_to_kcore(&mut self.working)?;
        let giant_component = {
            let _span = debug_span!("perco.largest_component", nodes = self.working.len()).entered();
            self.finder.largest_component_size(&self.working)?
        };

        if self.check_invariants {
            self.working.check_invariants().inspect_err(|err| {
                error!(code = %err.code(), error = %err, "working graph failed invariant check");
            })?;
        }

        let node_count = self.working.len() as f64;
        let outcome = TrialOutcome {
            occupation,
            attacked_nodes: attack.target(),
            attacked_fraction: attack.target() as f64 / node_count,
            giant_component,
            giant_fraction: giant_component as f64 / node_count,
            prune_passes: prune.passes(),
            pruned_nodes: prune.removed(),
        };
        info!(
            attacked = outcome.attacked_nodes,
            giant = outcome.giant_component,
            giant_fraction = outcome.giant_fraction,
            passes = outcome.prune_passes,
            "trial complete"
        );
        Ok(outcome)
    }

    /// Runs every trial of the schedule, handing each outcome to
    /// `on_trial` as soon as it is available. Returns the number of trials
    /// run.
    ///
    /// Streaming lets callers persist results without buffering a whole
    /// sweep.
    ///
    /// # Errors
    /// Stops at the first trial or callback failure and returns it.
    #[instrument(
        name = "experiment.sweep",
        err,
        skip(self, on_trial),
        fields(nodes = self.pristine.len(), trials = self.sweep.len()),
    )]
    pub fn run_sweep_with<F, E>(&mut self, mut on_trial: F) -> core::result::Result<usize, E>
    where
        F: FnMut(&TrialOutcome) -> core::result::Result<(), E>,
        E: From<PercolationError> + core::fmt::Display,
    {
        let sweep = self.sweep;
        let mut trials = 0_usize;
        for occupation in sweep.probabilities() {
            let outcome = self.run_trial(occupation)?;
            on_trial(&outcome)?;
            trials += 1;
        }
        Ok(trials)
    }

    /// Runs the whole schedule and collects the outcomes.
    ///
    /// # Errors
    /// Stops at the first failing trial and returns its error.
    pub fn run_sweep(&mut self) -> Result<Vec<TrialOutcome>> {
        let mut outcomes = Vec::with_capacity(self.sweep.len());
        self.run_sweep_with(|outcome| {
            outcomes.push(*outcome);
            Ok::<(), PercolationError>(())
        })?;
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::classic(1.0, 0.005, 0.1, 181)]
    #[case::single(1.0, 0.005, 1.0, 1)]
    #[case::uneven(1.0, 0.3, 0.5, 2)]
    #[case::quarter(0.75, 0.25, 0.25, 3)]
    fn sweep_len_includes_endpoint(
        #[case] start: f64,
        #[case] step: f64,
        #[case] stop: f64,
        #[case] expected: usize,
    ) {
        let sweep = Sweep::new(start, step, stop).expect("valid sweep");
        assert_eq!(sweep.len(), expected);
        assert_eq!(sweep.probabilities().count(), expected);
    }

    #[test]
    fn classic_sweep_ends_at_inverse_mean_degree() {
        let sweep = Sweep::for_mean_degree(10.0).expect("valid mean degree");
        let probabilities: Vec<f64> = sweep.probabilities().collect();

        assert_eq!(probabilities.first().copied(), Some(1.0));
        assert!((probabilities[1] - 0.995).abs() < 1e-12);
        let last = probabilities.last().copied().expect("non-empty sweep");
        assert!((last - 0.1).abs() < 1e-12);
        assert!(probabilities.windows(2).all(|pair| pair[0] > pair[1]));
        assert!(probabilities.iter().all(|&p| p >= sweep.stop()));
    }

    #[rstest]
    #[case::start_zero(0.0, 0.1, 0.1)]
    #[case::start_above_one(1.5, 0.1, 0.5)]
    #[case::zero_step(1.0, 0.0, 0.5)]
    #[case::nan_step(1.0, f64::NAN, 0.5)]
    #[case::stop_above_start(0.5, 0.1, 0.8)]
    #[case::stop_zero(1.0, 0.1, 0.0)]
    fn sweep_rejects_malformed_schedules(#[case] start: f64, #[case] step: f64, #[case] stop: f64) {
        let err = Sweep::new(start, step, stop).expect_err("schedule must be rejected");
        assert!(matches!(err, PercolationError::InvalidSweep { .. }));
    }

    #[rstest]
    #[case::sub_unit(0.5)]
    #[case::zero(0.0)]
    #[case::infinite(f64::INFINITY)]
    fn classic_sweep_needs_mean_degree_of_at_least_one(#[case] mean_degree: f64) {
        let err = Sweep::for_mean_degree(mean_degree).expect_err("mean degree must be rejected");
        assert_eq!(err.code().as_str(), "PERCOLATE_INVALID_SWEEP");
    }
}
