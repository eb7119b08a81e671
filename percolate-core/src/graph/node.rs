//! Node storage for the percolation graph.
//!
//! A node owns its adjacency list, its k-core threshold, and an optional
//! coupling record used only by interdependent-network experiments.

use crate::error::{PercolationError, Result};

/// Interdependency and protection state attached to a node.
///
/// Single-network sweeps never touch this record; it exists so coupled
/// experiments can share the same graph type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coupling {
    dependence: u32,
    dependants: Vec<usize>,
    protected: bool,
}

impl Coupling {
    /// Returns the dependence value (non-zero when the node depends on a peer).
    #[must_use]
    pub fn dependence(&self) -> u32 {
        self.dependence
    }

    /// Returns the nodes recorded as depending on this one.
    #[must_use]
    pub fn dependants(&self) -> &[usize] {
        &self.dependants
    }

    /// Returns whether the node is immune to attack and pruning.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.protected
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Node {
    neighbours: Vec<usize>,
    threshold: usize,
    coupling: Coupling,
}

impl Node {
    #[inline]
    pub(crate) fn neighbours(&self) -> &[usize] {
        &self.neighbours
    }

    #[inline]
    pub(crate) fn degree(&self) -> usize {
        self.neighbours.len()
    }

    pub(crate) fn has_neighbour(&self, other: usize) -> bool {
        self.neighbours.contains(&other)
    }

    /// Appends `other` without checking for duplicates; [`super::Graph`]
    /// checks existence before calling.
    pub(crate) fn add_neighbour(&mut self, other: usize) {
        self.neighbours.push(other);
    }

    /// Removes `other` from the adjacency list.
    ///
    /// Order within the list is not preserved. A missing neighbour means the
    /// graph has lost symmetry and is reported as an invariant violation.
    pub(crate) fn remove_neighbour(&mut self, own_id: usize, other: usize) -> Result<()> {
        let position = self
            .neighbours
            .iter()
            .position(|&candidate| candidate == other)
            .ok_or(PercolationError::MissingNeighbour {
                node: own_id,
                neighbour: other,
            })?;
        self.neighbours.swap_remove(position);
        Ok(())
    }

    /// Detaches and returns the whole adjacency list.
    pub(crate) fn take_neighbours(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.neighbours)
    }

    /// Reinstalls a list taken with [`Self::take_neighbours`], reusing its
    /// allocation.
    pub(crate) fn restore_neighbours(&mut self, mut neighbours: Vec<usize>) {
        neighbours.clear();
        self.neighbours = neighbours;
    }

    #[inline]
    pub(crate) fn threshold(&self) -> usize {
        self.threshold
    }

    pub(crate) fn set_threshold(&mut self, threshold: usize) {
        self.threshold = threshold;
    }

    pub(crate) fn coupling(&self) -> &Coupling {
        &self.coupling
    }

    pub(crate) fn set_dependence(&mut self, value: u32) {
        self.coupling.dependence = value;
    }

    pub(crate) fn add_dependant(&mut self, dependant: usize) {
        self.coupling.dependants.push(dependant);
    }

    pub(crate) fn remove_dependant(&mut self, own_id: usize, dependant: usize) -> Result<()> {
        let position = self
            .coupling
            .dependants
            .iter()
            .position(|&candidate| candidate == dependant)
            .ok_or(PercolationError::MissingDependant {
                node: own_id,
                dependant,
            })?;
        self.coupling.dependants.remove(position);
        Ok(())
    }

    pub(crate) fn clear_dependants(&mut self) {
        self.coupling.dependants.clear();
    }

    pub(crate) fn set_protected(&mut self, protected: bool) {
        self.coupling.protected = protected;
    }

    #[inline]
    pub(crate) fn is_protected(&self) -> bool {
        self.coupling.protected
    }
}
