//! Connected-component extraction.
//!
//! Components are discovered with an explicit-stack depth-first search so
//! that giant components of millions of nodes never touch the call stack.
//! Nodes are visited in identifier order, which makes the tie-break between
//! equally sized components deterministic: the first one discovered wins.

use tracing::{debug, instrument};

use crate::{
    error::{PercolationError, Result},
    graph::Graph,
};

/// Reusable scratch space for component searches.
///
/// The visited markers and DFS stack are kept between calls, so a sweep can
/// hold one finder for its lifetime and pay for the allocations once.
///
/// # Examples
/// ```
/// use percolate_core::{ClusterFinder, Graph};
///
/// let mut graph = Graph::new(5);
/// graph.insert_edge(0, 1)?;
/// graph.insert_edge(3, 4)?;
///
/// let mut finder = ClusterFinder::default();
/// let sizes: Vec<usize> = finder.components(&graph)?.iter().map(Vec::len).collect();
/// assert_eq!(sizes, vec![2, 1, 2]);
/// assert_eq!(finder.largest_component(&graph)?, vec![0, 1]);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct ClusterFinder {
    visited: Vec<bool>,
    stack: Vec<usize>,
    current: Vec<usize>,
}

impl ClusterFinder {
    /// Creates a finder with no scratch space allocated yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls `visit` once per connected component, in order of each
    /// component's smallest identifier.
    ///
    /// Every node belongs to exactly one component; isolated nodes are
    /// reported as singletons. The slice lists members in discovery order.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] when an adjacency list
    /// names a node outside the graph, which only a corrupt graph can hold.
    pub fn for_each_component<F>(&mut self, graph: &Graph, mut visit: F) -> Result<()>
    where
        F: FnMut(&[usize]),
    {
        let nodes = graph.nodes();
        let node_count = nodes.len();
        self.visited.clear();
        self.visited.resize(node_count, false);

        for root in 0..node_count {
            if mark(&mut self.visited, root, node_count)? {
                continue;
            }
            self.current.clear();
            self.stack.clear();
            self.stack.push(root);

            while let Some(node) = self.stack.pop() {
                self.current.push(node);
                let members = nodes
                    .get(node)
                    .ok_or(PercolationError::NodeOutOfBounds { node, node_count })?;
                for &neighbour in members.neighbours() {
                    if !mark(&mut self.visited, neighbour, node_count)? {
                        self.stack.push(neighbour);
                    }
                }
            }
            visit(&self.current);
        }
        Ok(())
    }

    /// Collects every connected component.
    ///
    /// # Errors
    /// See [`Self::for_each_component`].
    pub fn components(&mut self, graph: &Graph) -> Result<Vec<Vec<usize>>> {
        let mut components = Vec::new();
        self.for_each_component(graph, |members| components.push(members.to_vec()))?;
        Ok(components)
    }

    /// Returns the members of the largest connected component.
    ///
    /// Ties go to the component discovered first, i.e. the one holding the
    /// smallest identifier. An empty graph yields an empty vector.
    ///
    /// # Errors
    /// See [`Self::for_each_component`].
    pub fn largest_component(&mut self, graph: &Graph) -> Result<Vec<usize>> {
        let mut largest: Vec<usize> = Vec::new();
        self.for_each_component(graph, |members| {
            if members.len() > largest.len() {
                largest.clear();
                largest.extend_from_slice(members);
            }
        })?;
        Ok(largest)
    }

    /// Returns the size of the largest connected component.
    ///
    /// # Errors
    /// See [`Self::for_each_component`].
    pub fn largest_component_size(&mut self, graph: &Graph) -> Result<usize> {
        let mut largest = 0;
        self.for_each_component(graph, |members| largest = largest.max(members.len()))?;
        Ok(largest)
    }
}

/// Marks `node` visited, returning whether it already was.
fn mark(visited: &mut [bool], node: usize, node_count: usize) -> Result<bool> {
    let slot = visited
        .get_mut(node)
        .ok_or(PercolationError::NodeOutOfBounds { node, node_count })?;
    Ok(std::mem::replace(slot, true))
}

/// Returns the members of the largest connected component of `graph`.
///
/// Convenience wrapper allocating a fresh [`ClusterFinder`].
///
/// # Errors
/// See [`ClusterFinder::for_each_component`].
#[instrument(name = "perco.largest_component", err, skip(graph), fields(nodes = graph.len()))]
pub fn largest_component(graph: &Graph) -> Result<Vec<usize>> {
    let largest = ClusterFinder::new().largest_component(graph)?;
    debug!(size = largest.len(), "largest component found");
    Ok(largest)
}
