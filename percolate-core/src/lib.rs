//! Percolate core library.
//!
//! Heterogeneous k-core percolation on sparse random graphs: build an
//! Erdős–Rényi substrate, give every node a k-core threshold, then for a
//! descending range of occupation probabilities attack a random fraction of
//! nodes, prune the survivors to their k-core, and measure the giant
//! component.
//!
//! # Examples
//! ```
//! use percolate_core::{ExperimentBuilder, Sweep, ThresholdAssigner};
//!
//! let mut experiment = ExperimentBuilder::new()
//!     .with_node_count(500)
//!     .with_mean_degree(6.0)
//!     .with_thresholds(ThresholdAssigner::new(3, 0.5, 2)?)
//!     .with_sweep(Sweep::new(1.0, 0.1, 0.5)?)
//!     .build()?;
//! let outcomes = experiment.run_sweep()?;
//! assert_eq!(outcomes.len(), 6);
//! assert!(outcomes.iter().all(|trial| trial.giant_fraction <= 1.0));
//! # Ok::<(), percolate_core::PercolationError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod cluster;
mod error;
mod experiment;
mod graph;
mod percolation;
mod rng;
mod substrate;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{DEFAULT_MEAN_DEGREE, DEFAULT_NODE_COUNT, DEFAULT_SEED, ExperimentBuilder},
    cluster::{ClusterFinder, largest_component},
    error::{PercolationError, PercolationErrorCode, Result},
    experiment::{DEFAULT_SWEEP_STEP, Experiment, Sweep, TrialOutcome},
    graph::{Coupling, Graph, GraphInvariant},
    percolation::{
        AttackOutcome, PruneOutcome, attack_target, prune_in_order, prune_to_kcore, random_attack,
    },
    rng::{UniformSource, seeded_rng},
    substrate::{
        RandomGraphBuilder, ThresholdAssigner, build_complete_dependence, build_partial_dependence,
    },
};
