//! Fixture types for percolation property tests.

use test_strategy::Arbitrary;

use crate::graph::Graph;

/// Topology family used to seed a fixture graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum GraphShape {
    /// Erdős–Rényi graph with mean degree between 1 and 4.
    #[weight(3)]
    Sparse,
    /// Erdős–Rényi graph with mean degree close to the node count.
    #[weight(2)]
    Dense,
    /// Disjoint cliques of three to five nodes.
    #[weight(2)]
    Cliques,
    /// No edges at all.
    #[weight(1)]
    Empty,
}

/// Graph plus the parameters that produced it, kept for failure diagnosis.
#[derive(Clone, Debug)]
pub(super) struct PercolationFixture {
    /// Generated graph with thresholds assigned.
    pub graph: Graph,
    /// Shape used during generation.
    pub shape: GraphShape,
    /// Seed that reproduces the fixture.
    pub seed: u64,
}

/// A single mutation applied by the symmetry property.
#[derive(Clone, Copy, Debug, Arbitrary)]
pub(super) enum Mutation {
    /// Insert an edge between two identifiers taken modulo the node count.
    #[weight(3)]
    Insert(u8, u8),
    /// Isolate an identifier taken modulo the node count.
    #[weight(1)]
    Remove(u8),
}
