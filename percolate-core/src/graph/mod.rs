//! Arena-backed undirected graph used by the percolation engine.
//!
//! Nodes live in one contiguous store addressed by identifiers `0..N`. A
//! node is never removed from that index space: "removing" it clears its
//! adjacency so it survives as an isolated singleton with its threshold and
//! coupling state intact. Every mutation keeps adjacency symmetric, free of
//! self-loops, and free of duplicate edges.
//!
//! Cloning a graph copies all adjacency and scalar state, so per-trial resets
//! are a bulk copy from a pristine snapshot via [`Graph::reset_from`].

mod invariants;
mod node;

pub use self::{invariants::GraphInvariant, node::Coupling};

use tracing::trace;

use self::node::Node;
use crate::error::{PercolationError, Result};

/// Undirected simple graph with per-node k-core thresholds.
///
/// # Examples
/// ```
/// use percolate_core::Graph;
///
/// let mut graph = Graph::new(3);
/// graph.insert_edge(0, 1)?;
/// graph.insert_edge(1, 2)?;
/// assert_eq!(graph.degree(1)?, 2);
///
/// graph.remove_node(1)?;
/// assert_eq!(graph.degree(0)?, 0);
/// assert_eq!(graph.len(), 3);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// Creates a graph of `node_count` isolated nodes with threshold zero.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            nodes: vec![Node::default(); node_count],
        }
    }

    /// Returns the number of nodes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resizes the node store, discarding every edge.
    ///
    /// Administrative set-up only: truncating would leave dangling
    /// identifiers in surviving adjacency lists, so all adjacency and
    /// coupling state is reset. Never call this mid-trial.
    pub fn resize(&mut self, node_count: usize) {
        self.nodes.clear();
        self.nodes.resize(node_count, Node::default());
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Overwrites this graph with a deep copy of `pristine`, reusing existing
    /// allocations where possible.
    pub fn reset_from(&mut self, pristine: &Self) {
        self.nodes.clone_from(&pristine.nodes);
    }

    fn node(&self, id: usize) -> Result<&Node> {
        self.nodes.get(id).ok_or(PercolationError::NodeOutOfBounds {
            node: id,
            node_count: self.nodes.len(),
        })
    }

    fn node_mut(&mut self, id: usize) -> Result<&mut Node> {
        let node_count = self.nodes.len();
        self.nodes
            .get_mut(id)
            .ok_or(PercolationError::NodeOutOfBounds { node: id, node_count })
    }

    /// Returns the degree of `node`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    #[inline]
    pub fn degree(&self, node: usize) -> Result<usize> {
        Ok(self.node(node)?.degree())
    }

    /// Returns whether `left` and `right` are adjacent.
    ///
    /// Scans the adjacency of `left`, so the cost is `O(degree(left))`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] if either identifier is
    /// unknown.
    pub fn has_edge(&self, left: usize, right: usize) -> Result<bool> {
        self.node(right)?;
        Ok(self.node(left)?.has_neighbour(right))
    }

    /// Inserts the undirected edge `{left, right}`.
    ///
    /// # Errors
    /// Returns [`PercolationError::SelfLoop`] when `left == right`,
    /// [`PercolationError::DuplicateEdge`] when the edge already exists, and
    /// [`PercolationError::NodeOutOfBounds`] for unknown identifiers.
    pub fn insert_edge(&mut self, left: usize, right: usize) -> Result<()> {
        self.node(right)?;
        if left == right {
            return Err(PercolationError::SelfLoop { node: left });
        }
        if self.node(left)?.has_neighbour(right) {
            return Err(PercolationError::DuplicateEdge { left, right });
        }
        self.node_mut(left)?.add_neighbour(right);
        self.node_mut(right)?.add_neighbour(left);
        Ok(())
    }

    /// Isolates `node` by deleting every edge incident to it.
    ///
    /// The node keeps its slot, threshold, and coupling state. Isolating an
    /// already isolated node is a no-op.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier
    /// and [`PercolationError::MissingNeighbour`] when a neighbour lacks the
    /// reverse edge. The latter means the graph is corrupt; it is returned
    /// after the remaining neighbours have been detached so no dangling
    /// references to `node` survive.
    pub fn remove_node(&mut self, node: usize) -> Result<()> {
        let neighbours = self.node_mut(node)?.take_neighbours();
        trace!(node, degree = neighbours.len(), "isolating node");
        let mut outcome = Ok(());
        for &neighbour in &neighbours {
            let detached = self
                .node_mut(neighbour)
                .and_then(|other| other.remove_neighbour(neighbour, node));
            if outcome.is_ok() {
                outcome = detached;
            }
        }
        self.node_mut(node)?.restore_neighbours(neighbours);
        outcome
    }

    /// Returns a live view of the neighbours of `node`.
    ///
    /// The order is unspecified and changes as edges are removed.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    pub fn neighbours(&self, node: usize) -> Result<&[usize]> {
        Ok(self.node(node)?.neighbours())
    }

    /// Returns an owned snapshot of the neighbours of `node`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    pub fn neighbours_vec(&self, node: usize) -> Result<Vec<usize>> {
        Ok(self.neighbours(node)?.to_vec())
    }

    /// Returns the number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(Node::degree).sum::<usize>() / 2
    }

    /// Returns every edge once as `(smaller, larger)`, sorted.
    #[must_use]
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .nodes
            .iter()
            .enumerate()
            .flat_map(|(id, node)| {
                node.neighbours()
                    .iter()
                    .filter(move |&&other| id < other)
                    .map(move |&other| (id, other))
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Returns the k-core threshold of `node`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    pub fn threshold(&self, node: usize) -> Result<usize> {
        Ok(self.node(node)?.threshold())
    }

    /// Sets the k-core threshold of `node`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    pub fn set_threshold(&mut self, node: usize, threshold: usize) -> Result<()> {
        self.node_mut(node)?.set_threshold(threshold);
        Ok(())
    }

    /// Returns the coupling record of `node`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    pub fn coupling(&self, node: usize) -> Result<&Coupling> {
        Ok(self.node(node)?.coupling())
    }

    /// Returns the dependence value of `node`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    pub fn dependence(&self, node: usize) -> Result<u32> {
        Ok(self.node(node)?.coupling().dependence())
    }

    /// Sets the dependence value of `node`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    pub fn set_dependence(&mut self, node: usize, value: u32) -> Result<()> {
        self.node_mut(node)?.set_dependence(value);
        Ok(())
    }

    /// Records `dependant` as depending on `node`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    pub fn add_dependant(&mut self, node: usize, dependant: usize) -> Result<()> {
        self.node_mut(node)?.add_dependant(dependant);
        Ok(())
    }

    /// Removes `dependant` from the dependants of `node`.
    ///
    /// # Errors
    /// Returns [`PercolationError::MissingDependant`] if it was never recorded
    /// and [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    pub fn remove_dependant(&mut self, node: usize, dependant: usize) -> Result<()> {
        self.node_mut(node)?.remove_dependant(node, dependant)
    }

    /// Forgets every dependant of `node`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    pub fn clear_dependants(&mut self, node: usize) -> Result<()> {
        self.node_mut(node)?.clear_dependants();
        Ok(())
    }

    /// Marks `node` as immune to attack and pruning.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    pub fn protect(&mut self, node: usize) -> Result<()> {
        self.node_mut(node)?.set_protected(true);
        Ok(())
    }

    /// Clears the protection flag of `node`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    pub fn unprotect(&mut self, node: usize) -> Result<()> {
        self.node_mut(node)?.set_protected(false);
        Ok(())
    }

    /// Clears the protection flag on every node.
    pub fn unprotect_all(&mut self) {
        for node in &mut self.nodes {
            node.set_protected(false);
        }
    }

    /// Returns whether `node` is protected.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for an unknown identifier.
    pub fn is_protected(&self, node: usize) -> Result<bool> {
        Ok(self.node(node)?.is_protected())
    }

    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Appends `neighbour` to one adjacency list only, bypassing every
    /// check, so tests outside this module can build corrupt graphs.
    #[cfg(test)]
    pub(crate) fn push_unchecked_neighbour(&mut self, node: usize, neighbour: usize) {
        if let Some(slot) = self.nodes.get_mut(node) {
            slot.add_neighbour(neighbour);
        }
    }
}
