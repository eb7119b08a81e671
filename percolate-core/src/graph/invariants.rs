//! Structural invariant checks for [`Graph`].
//!
//! Mutation keeps these properties by construction; the checker exists so
//! tests and `--check-invariants` runs can confirm it after the fact without
//! reimplementing adjacency traversal.

use tracing::{Level, debug, trace};

use super::Graph;
use crate::error::{PercolationError, Result};

/// Structural properties every reachable [`Graph`] state satisfies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GraphInvariant {
    /// Every neighbour identifier lies inside the node store.
    InBounds,
    /// No node lists itself and no neighbour is listed twice.
    SimpleAdjacency,
    /// `j` is a neighbour of `i` exactly when `i` is a neighbour of `j`.
    Symmetry,
}

impl GraphInvariant {
    /// Returns all invariants in evaluation order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::InBounds, Self::SimpleAdjacency, Self::Symmetry]
    }
}

impl Graph {
    /// Verifies every [`GraphInvariant`], returning the first violation.
    ///
    /// Costs `O(sum of degree^2)` in the worst case because symmetry is
    /// checked by scanning each neighbour's list.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`],
    /// [`PercolationError::DuplicateNeighbour`], or
    /// [`PercolationError::AsymmetricEdge`] describing the first broken
    /// invariant.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::Graph;
    ///
    /// let mut graph = Graph::new(4);
    /// graph.insert_edge(0, 1)?;
    /// graph.insert_edge(2, 3)?;
    /// graph.remove_node(1)?;
    /// graph.check_invariants()?;
    /// # Ok::<(), percolate_core::PercolationError>(())
    /// ```
    pub fn check_invariants(&self) -> Result<()> {
        if tracing::enabled!(Level::TRACE) {
            trace!(
                nodes = self.len(),
                edges = self.edge_count(),
                "checking graph invariants"
            );
        }
        for invariant in GraphInvariant::all() {
            self.check_invariant(invariant)?;
        }
        Ok(())
    }

    /// Verifies a single [`GraphInvariant`].
    ///
    /// # Errors
    /// Returns the first violation of `invariant`.
    pub fn check_invariant(&self, invariant: GraphInvariant) -> Result<()> {
        let result = match invariant {
            GraphInvariant::InBounds => self.check_in_bounds(),
            GraphInvariant::SimpleAdjacency => self.check_simple_adjacency(),
            GraphInvariant::Symmetry => self.check_symmetry(),
        };
        if let Err(err) = &result {
            debug!(?invariant, error = %err, "graph invariant violated");
        }
        result
    }

    fn check_in_bounds(&self) -> Result<()> {
        let node_count = self.len();
        for node in self.nodes() {
            if let Some(&neighbour) = node.neighbours().iter().find(|&&id| id >= node_count) {
                return Err(PercolationError::NodeOutOfBounds {
                    node: neighbour,
                    node_count,
                });
            }
        }
        Ok(())
    }

    fn check_simple_adjacency(&self) -> Result<()> {
        let mut seen = vec![false; self.len()];
        for (id, node) in self.nodes().iter().enumerate() {
            let mut outcome = Ok(());
            for &neighbour in node.neighbours() {
                let Some(slot) = seen.get_mut(neighbour) else {
                    continue;
                };
                if neighbour == id || *slot {
                    outcome = Err(PercolationError::DuplicateNeighbour { node: id, neighbour });
                    break;
                }
                *slot = true;
            }
            for &neighbour in node.neighbours() {
                if let Some(slot) = seen.get_mut(neighbour) {
                    *slot = false;
                }
            }
            outcome?;
        }
        Ok(())
    }

    fn check_symmetry(&self) -> Result<()> {
        let nodes = self.nodes();
        for (id, node) in nodes.iter().enumerate() {
            for &neighbour in node.neighbours() {
                let backlinked = nodes
                    .get(neighbour)
                    .is_some_and(|other| other.has_neighbour(id));
                if !backlinked {
                    return Err(PercolationError::AsymmetricEdge {
                        source_node: id,
                        target: neighbour,
                    });
                }
            }
        }
        Ok(())
    }
}
