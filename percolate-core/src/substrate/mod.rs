//! Construction of the pristine substrate: random edges, per-node k-core
//! thresholds, and optional interdependency between two networks.
//!
//! Everything here runs once before the sweep; the resulting graph is the
//! read-only snapshot every trial is reset from.

mod coupling;
mod random_graph;
mod thresholds;

pub use self::{
    coupling::{build_complete_dependence, build_partial_dependence},
    random_graph::RandomGraphBuilder,
    thresholds::ThresholdAssigner,
};
