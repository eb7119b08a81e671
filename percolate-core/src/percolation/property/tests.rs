//! Property runners for attack and pruning.

use proptest::prelude::*;
use proptest::test_runner::{TestCaseError, TestCaseResult};
use rstest::rstest;

use crate::{
    graph::Graph,
    percolation::{attack_target, prune_in_order, prune_to_kcore, random_attack},
    rng::seeded_rng,
    test_utils::suite_proptest_config,
};

use super::{
    strategies::{
        fixture_strategy, generate_fixture, generate_fixture_with_nodes, shuffled_order,
    },
    types::{GraphShape, Mutation, PercolationFixture},
};

fn assert_kcore(graph: &Graph) -> TestCaseResult {
    for node in 0..graph.len() {
        let degree = graph.degree(node).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let threshold = graph
            .threshold(node)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(
            degree == 0 || degree >= threshold,
            "node {node} kept degree {degree} below threshold {threshold}",
        );
    }
    Ok(())
}

fn run_prune_fixed_point(fixture: &PercolationFixture) -> TestCaseResult {
    let mut graph = fixture.graph.clone();
    let first = prune_to_kcore(&mut graph).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert!(first.passes() <= graph.len() + 1);
    prop_assert_eq!(first.removals_per_pass().last().copied(), Some(0));
    assert_kcore(&graph)?;
    graph
        .check_invariants()
        .map_err(|e| TestCaseError::fail(e.to_string()))?;

    let settled = graph.clone();
    let second = prune_to_kcore(&mut graph).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(second.passes(), 1);
    prop_assert_eq!(&graph, &settled);
    Ok(())
}

fn run_order_independence(fixture: &PercolationFixture, order_seed: u64) -> TestCaseResult {
    let mut canonical = fixture.graph.clone();
    prune_to_kcore(&mut canonical).map_err(|e| TestCaseError::fail(e.to_string()))?;

    let mut shuffled = fixture.graph.clone();
    let order = shuffled_order(shuffled.len(), order_seed);
    prune_in_order(&mut shuffled, &order).map_err(|e| TestCaseError::fail(e.to_string()))?;

    prop_assert_eq!(
        canonical.edges(),
        shuffled.edges(),
        "shape={:?} seed={} order={:?}",
        fixture.shape,
        fixture.seed,
        order,
    );
    Ok(())
}

fn run_attack_exactness(fixture: &PercolationFixture, occupation: f64) -> TestCaseResult {
    let mut graph = fixture.graph.clone();
    let outcome = random_attack(&mut graph, occupation, &mut seeded_rng(fixture.seed))
        .map_err(|e| TestCaseError::fail(e.to_string()))?;

    let expected = attack_target(occupation, graph.len());
    prop_assert_eq!(outcome.target(), expected);
    prop_assert_eq!(outcome.attacked_nodes().count(), expected);
    prop_assert!(outcome.draws() >= expected as u64);
    for node in outcome.attacked_nodes() {
        prop_assert_eq!(graph.degree(node).ok(), Some(0));
    }
    for (left, right) in graph.edges() {
        prop_assert!(!outcome.was_attacked(left) && !outcome.was_attacked(right));
        prop_assert!(fixture.graph.has_edge(left, right).unwrap_or(false));
    }
    graph
        .check_invariants()
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    Ok(())
}

fn run_mutation_symmetry(node_count: usize, mutations: &[Mutation]) -> TestCaseResult {
    let mut graph = Graph::new(node_count);
    for mutation in mutations {
        match *mutation {
            Mutation::Insert(left, right) => {
                let left = usize::from(left) % node_count;
                let right = usize::from(right) % node_count;
                let existed = left != right && graph.has_edge(left, right).unwrap_or(false);
                let inserted = graph.insert_edge(left, right);
                prop_assert_eq!(inserted.is_ok(), left != right && !existed);
            }
            Mutation::Remove(node) => {
                let node = usize::from(node) % node_count;
                graph
                    .remove_node(node)
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(graph.degree(node).ok(), Some(0));
            }
        }
        graph
            .check_invariants()
            .map_err(|e| TestCaseError::fail(format!("after {mutation:?}: {e}")))?;
    }
    Ok(())
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn pruning_reaches_idempotent_kcore(fixture in fixture_strategy()) {
        run_prune_fixed_point(&fixture)?;
    }

    #[test]
    fn pruning_is_order_independent(fixture in fixture_strategy(), order_seed in any::<u64>()) {
        run_order_independence(&fixture, order_seed)?;
    }

    #[test]
    fn attack_selects_exact_target(
        fixture in fixture_strategy(),
        occupation in 0.05_f64..=1.0,
    ) {
        run_attack_exactness(&fixture, occupation)?;
    }

    #[test]
    fn mutations_preserve_symmetry(
        node_count in 1_usize..24,
        mutations in proptest::collection::vec(any::<Mutation>(), 0..64),
    ) {
        run_mutation_symmetry(node_count, &mutations)?;
    }
}

#[rstest]
#[case::sparse_42(GraphShape::Sparse, 42)]
#[case::dense_7(GraphShape::Dense, 7)]
#[case::cliques_99(GraphShape::Cliques, 99)]
#[case::empty_1(GraphShape::Empty, 1)]
fn targeted_fixtures_satisfy_properties(#[case] shape: GraphShape, #[case] seed: u64) {
    let fixture = generate_fixture(shape, seed);
    run_prune_fixed_point(&fixture).expect("pruning must reach an idempotent k-core");
    run_order_independence(&fixture, seed.wrapping_add(1)).expect("order must not matter");
    run_attack_exactness(&fixture, 0.6).expect("attack must hit its target");
}

#[rstest]
#[case::sparse_pair(GraphShape::Sparse, 2)]
#[case::sparse_triple(GraphShape::Sparse, 3)]
#[case::dense_pair(GraphShape::Dense, 2)]
#[case::sparse_singleton(GraphShape::Sparse, 1)]
fn tiny_fixtures_respect_simple_graph_capacity(
    #[case] shape: GraphShape,
    #[case] nodes: usize,
) {
    for seed in 0..32 {
        let fixture = generate_fixture_with_nodes(shape, nodes, seed);
        assert_eq!(fixture.graph.len(), nodes);
        assert!(fixture.graph.edge_count() <= nodes * nodes.saturating_sub(1) / 2);
        run_prune_fixed_point(&fixture).expect("pruning must reach an idempotent k-core");
        run_order_independence(&fixture, seed).expect("order must not matter");
        run_attack_exactness(&fixture, 0.5).expect("attack must hit its target");
    }
}

#[test]
fn shuffled_order_is_a_seeded_permutation() {
    let order = shuffled_order(40, 5);
    assert_eq!(order, shuffled_order(40, 5));
    let mut sorted = order.clone();
    sorted.sort_unstable();
    assert!(sorted.into_iter().eq(0..40));
}
