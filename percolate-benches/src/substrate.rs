//! Prepared substrates shared by the benchmarks.
//!
//! Every benchmark builds from a fixed seed so runs compare like with like.

use percolate_core::{
    Experiment, ExperimentBuilder, Graph, Sweep, ThresholdAssigner, prune_to_kcore,
};
use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::{error::BenchSetupError, params::SubstrateBenchParams};

/// Seed used for every prepared substrate.
pub const SEED: u64 = 42;

/// Builds an experiment with the classic `3 / 0.5 / 2` threshold mix.
///
/// The sweep is a single trial at full occupation; benchmarks call
/// [`Experiment::run_trial`] directly.
///
/// # Errors
/// Returns [`BenchSetupError::Percolation`] if the substrate cannot be built.
pub fn prepared_experiment(
    params: SubstrateBenchParams,
) -> Result<Experiment<SmallRng>, BenchSetupError> {
    let experiment = ExperimentBuilder::new()
        .with_node_count(params.node_count)
        .with_mean_degree(params.mean_degree)
        .with_thresholds(ThresholdAssigner::new(3, 0.5, 2)?)
        .with_seed(SEED)
        .with_sweep(Sweep::new(1.0, 1.0, 1.0)?)
        .build()?;
    Ok(experiment)
}

/// Returns the pruned pristine substrate, the graph the component search
/// sees at full occupation.
///
/// # Errors
/// Returns [`BenchSetupError::Percolation`] if the substrate cannot be built
/// or pruned.
pub fn pruned_substrate(params: SubstrateBenchParams) -> Result<Graph, BenchSetupError> {
    let experiment = prepared_experiment(params)?;
    let mut graph = experiment.pristine().clone();
    prune_to_kcore(&mut graph)?;
    Ok(graph)
}

/// Returns a seeded random permutation of `0..node_count` for
/// order-sensitive pruning benchmarks.
#[must_use]
pub fn shuffled_order(node_count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..node_count).collect();
    order.shuffle(&mut SmallRng::seed_from_u64(SEED));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffled_order_is_a_permutation() {
        let mut order = shuffled_order(64);
        order.sort_unstable();
        assert!(order.into_iter().eq(0..64));
    }

    #[test]
    fn prepared_experiment_places_expected_edges() -> Result<(), BenchSetupError> {
        let experiment = prepared_experiment(SubstrateBenchParams {
            node_count: 1_000,
            mean_degree: 4.0,
        })?;
        assert_eq!(experiment.edge_count(), 2_000);
        assert_eq!(experiment.sweep().len(), 1);
        Ok(())
    }
}
