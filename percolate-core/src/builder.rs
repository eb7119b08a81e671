//! Builder for configuring percolation experiments.
//!
//! Validation happens in [`ExperimentBuilder::build`], which also constructs
//! the pristine substrate so an [`Experiment`] is always ready to run.

use rand::rngs::SmallRng;
use tracing::{error, info};

use crate::{
    error::{PercolationError, Result},
    experiment::{Experiment, ExperimentParts, Sweep},
    graph::Graph,
    rng::{UniformSource, seeded_rng},
    substrate::{RandomGraphBuilder, ThresholdAssigner},
};

/// Node count used when none is configured.
pub const DEFAULT_NODE_COUNT: usize = 1_000_000;
/// Mean degree used when none is configured.
pub const DEFAULT_MEAN_DEGREE: f64 = 10.0;
/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 1;

/// Configures and constructs [`Experiment`] instances.
///
/// # Examples
/// ```
/// use percolate_core::{ExperimentBuilder, ThresholdAssigner};
///
/// let mut experiment = ExperimentBuilder::new()
///     .with_node_count(200)
///     .with_mean_degree(4.0)
///     .with_thresholds(ThresholdAssigner::new(3, 0.5, 2)?)
///     .with_seed(9)
///     .build()?;
/// assert_eq!(experiment.edge_count(), 400);
///
/// let outcome = experiment.run_trial(1.0)?;
/// assert_eq!(outcome.attacked_nodes, 0);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ExperimentBuilder {
    node_count: usize,
    mean_degree: f64,
    thresholds: ThresholdAssigner,
    seed: u64,
    sweep: Option<Sweep>,
    check_invariants: bool,
}

impl Default for ExperimentBuilder {
    fn default() -> Self {
        Self {
            node_count: DEFAULT_NODE_COUNT,
            mean_degree: DEFAULT_MEAN_DEGREE,
            thresholds: ThresholdAssigner::default(),
            seed: DEFAULT_SEED,
            sweep: None,
            check_invariants: false,
        }
    }
}

impl ExperimentBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::ExperimentBuilder;
    ///
    /// let builder = ExperimentBuilder::new();
    /// assert_eq!(builder.node_count(), 1_000_000);
    /// assert_eq!(builder.mean_degree(), 10.0);
    /// assert_eq!(builder.seed(), 1);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of nodes in the substrate.
    #[must_use]
    pub fn with_node_count(mut self, node_count: usize) -> Self {
        self.node_count = node_count;
        self
    }

    /// Returns the configured node count.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Overrides the mean degree of the substrate.
    #[must_use]
    pub fn with_mean_degree(mut self, mean_degree: f64) -> Self {
        self.mean_degree = mean_degree;
        self
    }

    /// Returns the configured mean degree.
    #[must_use]
    pub fn mean_degree(&self) -> f64 {
        self.mean_degree
    }

    /// Sets the two-valued threshold mix. Defaults to threshold `0`
    /// everywhere.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: ThresholdAssigner) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Returns the configured threshold mix.
    #[must_use]
    pub fn thresholds(&self) -> &ThresholdAssigner {
        &self.thresholds
    }

    /// Sets the seed for the generator created by [`ExperimentBuilder::build`].
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Replaces the default schedule, which is
    /// [`Sweep::for_mean_degree`] of the configured mean degree.
    #[must_use]
    pub fn with_sweep(mut self, sweep: Sweep) -> Self {
        self.sweep = Some(sweep);
        self
    }

    /// Returns the explicitly configured schedule, if any.
    #[must_use]
    pub fn sweep(&self) -> Option<&Sweep> {
        self.sweep.as_ref()
    }

    /// Enables verification of adjacency invariants after construction and
    /// after every trial. Costs one extra linear scan per trial.
    #[must_use]
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    /// Returns whether invariant checks are enabled.
    #[must_use]
    pub fn invariant_checks(&self) -> bool {
        self.check_invariants
    }

    /// Validates the configuration and builds the substrate using a
    /// `SmallRng` seeded from [`ExperimentBuilder::seed`].
    ///
    /// # Errors
    /// See [`ExperimentBuilder::build_with_source`].
    pub fn build(self) -> Result<Experiment<SmallRng>> {
        let source = seeded_rng(self.seed);
        self.build_with_source(source)
    }

    /// Validates the configuration and builds the substrate, drawing every
    /// deviate from `source`.
    ///
    /// Edges are placed first, then thresholds, so a given source state
    /// always yields the same substrate.
    ///
    /// # Errors
    /// Returns [`PercolationError::EmptyGraph`] for a zero node count,
    /// [`PercolationError::InvalidMeanDegree`] for a negative or non-finite
    /// mean degree, [`PercolationError::InvalidSweep`] when no schedule was
    /// given and the mean degree is below `1`, and
    /// [`PercolationError::EdgeTargetUnreachable`] when the mean degree
    /// asks for more edges than a simple graph can hold.
    pub fn build_with_source<S: UniformSource>(self, mut source: S) -> Result<Experiment<S>> {
        if self.node_count == 0 {
            return Err(PercolationError::EmptyGraph);
        }
        let edge_builder = RandomGraphBuilder::new(self.mean_degree)?;
        let sweep = match self.sweep {
            Some(sweep) => sweep,
            None => Sweep::for_mean_degree(self.mean_degree)?,
        };

        let mut pristine = Graph::new(self.node_count);
        let edge_count = edge_builder.build(&mut pristine, &mut source)?;
        let first_threshold_nodes = self.thresholds.assign(&mut pristine, &mut source)?;
        if self.check_invariants {
            pristine.check_invariants().inspect_err(|err| {
                error!(code = %err.code(), error = %err, "pristine graph failed invariant check");
            })?;
        }

        info!(
            nodes = self.node_count,
            edges = edge_count,
            first_threshold_nodes,
            trials = sweep.len(),
            "substrate ready"
        );
        Ok(Experiment::from_parts(ExperimentParts {
            pristine,
            source,
            sweep,
            thresholds: self.thresholds,
            mean_degree: self.mean_degree,
            edge_count,
            first_threshold_nodes,
            check_invariants: self.check_invariants,
        }))
    }
}
