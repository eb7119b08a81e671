//! Shared test utilities for `percolate-core`.

use percolate_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{graph::Graph, rng::UniformSource};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `PERCOLATE_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// [`UniformSource`] replaying a fixed script of deviates, wrapping around
/// once exhausted.
#[derive(Clone, Debug)]
pub(crate) struct ScriptedSource {
    values: Vec<f64>,
    consumed: usize,
}

impl ScriptedSource {
    /// Creates a source replaying `values` in order.
    pub(crate) fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "scripted source needs at least one value");
        Self {
            values,
            consumed: 0,
        }
    }

    /// Returns how many deviates have been handed out.
    pub(crate) fn consumed(&self) -> usize {
        self.consumed
    }
}

impl UniformSource for ScriptedSource {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.consumed % self.values.len()];
        self.consumed += 1;
        value
    }
}

/// Builds a graph of `node_count` nodes holding exactly `edges`.
pub(crate) fn graph_from_edges(node_count: usize, edges: &[(usize, usize)]) -> Graph {
    let mut graph = Graph::new(node_count);
    for &(left, right) in edges {
        graph
            .insert_edge(left, right)
            .unwrap_or_else(|err| panic!("edge ({left}, {right}) must insert: {err}"));
    }
    graph
}

/// Builds the path `0 - 1 - ... - (node_count - 1)` with a uniform threshold.
pub(crate) fn path_graph(node_count: usize, threshold: usize) -> Graph {
    let edges: Vec<(usize, usize)> = (1..node_count).map(|node| (node - 1, node)).collect();
    let mut graph = graph_from_edges(node_count, &edges);
    for node in 0..node_count {
        graph
            .set_threshold(node, threshold)
            .expect("node must be in bounds");
    }
    graph
}
