//! Heterogeneous k-core threshold assignment.

use tracing::{debug, instrument};

use crate::{
    error::{PercolationError, Result},
    graph::Graph,
    rng::UniformSource,
};

const PROBABILITY_SUM_TOLERANCE: f64 = 1e-9;

/// Draws a two-valued k-core threshold for every node.
///
/// Each node independently receives `first` with probability
/// `first_probability` and `second` otherwise.
///
/// # Examples
/// ```
/// use percolate_core::{Graph, ThresholdAssigner, seeded_rng};
///
/// let assigner = ThresholdAssigner::new(3, 1.0, 2)?;
/// let mut graph = Graph::new(4);
/// let first = assigner.assign(&mut graph, &mut seeded_rng(5))?;
/// assert_eq!(first, 4);
/// assert_eq!(graph.threshold(2)?, 3);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdAssigner {
    first: usize,
    first_probability: f64,
    second: usize,
}

impl Default for ThresholdAssigner {
    /// Every node receives threshold `0`, which reduces the sweep to plain
    /// site percolation with no pruning.
    fn default() -> Self {
        Self {
            first: 0,
            first_probability: 1.0,
            second: 0,
        }
    }
}

impl ThresholdAssigner {
    /// Creates an assigner; the second threshold implicitly receives
    /// probability `1 - first_probability`.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidProbability`] unless
    /// `first_probability` lies in `[0, 1]`.
    pub fn new(first: usize, first_probability: f64, second: usize) -> Result<Self> {
        if !(0.0..=1.0).contains(&first_probability) {
            return Err(PercolationError::InvalidProbability {
                name: "first threshold probability",
                range: "[0, 1]",
                value: first_probability,
            });
        }
        Ok(Self {
            first,
            first_probability,
            second,
        })
    }

    /// Creates an assigner from both probabilities, checking that they are
    /// complementary.
    ///
    /// # Errors
    /// Returns [`PercolationError::ProbabilitiesDoNotSum`] when the two
    /// probabilities do not sum to one, and
    /// [`PercolationError::InvalidProbability`] when either lies outside
    /// `[0, 1]`.
    pub fn with_probabilities(
        first: usize,
        first_probability: f64,
        second: usize,
        second_probability: f64,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&second_probability) {
            return Err(PercolationError::InvalidProbability {
                name: "second threshold probability",
                range: "[0, 1]",
                value: second_probability,
            });
        }
        let assigner = Self::new(first, first_probability, second)?;
        if (first_probability + second_probability - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(PercolationError::ProbabilitiesDoNotSum {
                first: first_probability,
                second: second_probability,
            });
        }
        Ok(assigner)
    }

    /// Returns the first threshold value.
    #[must_use]
    pub fn first(&self) -> usize {
        self.first
    }

    /// Returns the probability of drawing the first threshold.
    #[must_use]
    pub fn first_probability(&self) -> f64 {
        self.first_probability
    }

    /// Returns the second threshold value.
    #[must_use]
    pub fn second(&self) -> usize {
        self.second
    }

    /// Assigns a threshold to every node of `graph` in identifier order,
    /// consuming exactly one deviate per node. Returns how many nodes
    /// received the first threshold.
    ///
    /// # Errors
    /// Propagates graph accessor failures; none occur for identifiers in
    /// `0..graph.len()`.
    #[instrument(
        name = "graph.assign_thresholds",
        err,
        skip(self, graph, source),
        fields(
            nodes = graph.len(),
            first = self.first,
            first_probability = self.first_probability,
            second = self.second,
        ),
    )]
    pub fn assign<S>(&self, graph: &mut Graph, source: &mut S) -> Result<usize>
    where
        S: UniformSource + ?Sized,
    {
        let mut first_count = 0_usize;
        for node in 0..graph.len() {
            let threshold = if source.next_uniform() < self.first_probability {
                first_count += 1;
                self.first
            } else {
                self.second
            };
            graph.set_threshold(node, threshold)?;
        }
        debug!(
            first_count,
            second_count = graph.len() - first_count,
            "thresholds assigned"
        );
        Ok(first_count)
    }
}
