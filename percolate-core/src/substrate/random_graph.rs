//! Erdős–Rényi style substrate construction by rejection sampling.

use tracing::{debug, instrument};

use crate::{
    error::{PercolationError, Result},
    graph::Graph,
    rng::{UniformSource, uniform_index},
};

/// Builds a random graph with a target mean degree.
///
/// The builder places exactly `floor(N * mean_degree / 2)` edges by drawing
/// two uniform identifiers at a time and discarding self-pairs and pairs
/// that are already connected. In the sparse regime the degree distribution
/// is Poisson and almost every draw is accepted.
///
/// # Examples
/// ```
/// use percolate_core::{Graph, RandomGraphBuilder, seeded_rng};
///
/// let builder = RandomGraphBuilder::new(4.0)?;
/// let mut graph = Graph::new(100);
/// let inserted = builder.build(&mut graph, &mut seeded_rng(3))?;
/// assert_eq!(inserted, 200);
/// assert_eq!(graph.edge_count(), 200);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomGraphBuilder {
    mean_degree: f64,
}

impl RandomGraphBuilder {
    /// Creates a builder targeting `mean_degree`.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidMeanDegree`] when `mean_degree` is
    /// negative or not finite.
    pub fn new(mean_degree: f64) -> Result<Self> {
        if !mean_degree.is_finite() || mean_degree < 0.0 {
            return Err(PercolationError::InvalidMeanDegree { value: mean_degree });
        }
        Ok(Self { mean_degree })
    }

    /// Returns the configured mean degree.
    #[must_use]
    pub fn mean_degree(&self) -> f64 {
        self.mean_degree
    }

    /// Returns the number of edges [`Self::build`] places on `node_count`
    /// nodes.
    #[must_use]
    pub fn target_edges(&self, node_count: usize) -> usize {
        (node_count as f64 * self.mean_degree / 2.0).floor() as usize
    }

    /// Inserts [`Self::target_edges`] new edges into `graph`, returning the
    /// number inserted.
    ///
    /// # Errors
    /// Returns [`PercolationError::EdgeTargetUnreachable`] when the graph
    /// cannot hold that many additional edges, which would otherwise make the
    /// rejection loop spin forever.
    #[instrument(
        name = "graph.build",
        err,
        skip(self, graph, source),
        fields(nodes = graph.len(), mean_degree = self.mean_degree),
    )]
    pub fn build<S>(&self, graph: &mut Graph, source: &mut S) -> Result<usize>
    where
        S: UniformSource + ?Sized,
    {
        let node_count = graph.len();
        let target = self.target_edges(node_count);
        let capacity = max_simple_edges(node_count).saturating_sub(graph.edge_count());
        if target > capacity {
            return Err(PercolationError::EdgeTargetUnreachable {
                target,
                max_edges: capacity,
            });
        }

        let mut inserted = 0_usize;
        let mut rejected = 0_u64;
        while inserted < target {
            let left = uniform_index(source, node_count);
            let right = uniform_index(source, node_count);
            if left == right || graph.has_edge(left, right)? {
                rejected += 1;
                continue;
            }
            graph.insert_edge(left, right)?;
            inserted += 1;
        }
        debug!(edges = inserted, rejected, "substrate constructed");
        Ok(inserted)
    }
}

fn max_simple_edges(node_count: usize) -> usize {
    if node_count % 2 == 0 {
        (node_count / 2).saturating_mul(node_count.saturating_sub(1))
    } else {
        node_count.saturating_mul(node_count.saturating_sub(1) / 2)
    }
}
