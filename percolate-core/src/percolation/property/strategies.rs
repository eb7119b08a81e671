//! Strategy builders for percolation property tests.

use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::{
    graph::Graph,
    substrate::{RandomGraphBuilder, ThresholdAssigner},
};

use super::types::{GraphShape, PercolationFixture};

const MIN_NODES: usize = 2;
const MAX_NODES: usize = 48;

/// Generates fixtures across every [`GraphShape`].
pub(super) fn fixture_strategy() -> impl Strategy<Value = PercolationFixture> {
    (any::<GraphShape>(), any::<u64>()).prop_map(|(shape, seed)| generate_fixture(shape, seed))
}

/// Builds a fixture for an explicit shape and seed.
pub(super) fn generate_fixture(shape: GraphShape, seed: u64) -> PercolationFixture {
    let node_count = SmallRng::seed_from_u64(seed).gen_range(MIN_NODES..=MAX_NODES);
    generate_fixture_with_nodes(shape, node_count, seed)
}

/// Builds a fixture with exactly `node_count` nodes.
pub(super) fn generate_fixture_with_nodes(
    shape: GraphShape,
    node_count: usize,
    seed: u64,
) -> PercolationFixture {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut graph = Graph::new(node_count);
    // A simple graph on n nodes cannot exceed mean degree n - 1.
    let max_mean = node_count.saturating_sub(1) as f64;
    match shape {
        GraphShape::Sparse => {
            let mean = rng.gen_range(1.0..4.0_f64).min(max_mean);
            build_random(&mut graph, mean, &mut rng);
        }
        GraphShape::Dense => {
            let mean = max_mean * rng.gen_range(0.5..0.9);
            build_random(&mut graph, mean, &mut rng);
        }
        GraphShape::Cliques => build_cliques(&mut graph, &mut rng),
        GraphShape::Empty => {}
    }

    let first = rng.gen_range(0..=4);
    let second = rng.gen_range(0..=4);
    let assigner = ThresholdAssigner::new(first, rng.gen_range(0.0..=1.0), second)
        .expect("generated probability lies in [0, 1]");
    assigner
        .assign(&mut graph, &mut rng)
        .expect("assignment cannot fail on a valid graph");

    PercolationFixture { graph, shape, seed }
}

fn build_random(graph: &mut Graph, mean_degree: f64, rng: &mut SmallRng) {
    RandomGraphBuilder::new(mean_degree)
        .and_then(|builder| builder.build(graph, rng))
        .expect("generated mean degree must be reachable");
}

fn build_cliques(graph: &mut Graph, rng: &mut SmallRng) {
    let mut start = 0;
    while start < graph.len() {
        let size = rng.gen_range(3..=5).min(graph.len() - start);
        for left in start..start + size {
            for right in left + 1..start + size {
                graph.insert_edge(left, right).expect("clique edge is new");
            }
        }
        start += size;
    }
}

/// Returns a uniformly shuffled permutation of `0..node_count`.
pub(super) fn shuffled_order(node_count: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..node_count).collect();
    order.shuffle(&mut SmallRng::seed_from_u64(seed));
    order
}
