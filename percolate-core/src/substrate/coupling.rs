//! Interdependency set-up between two equally sized networks.
//!
//! Node `i` of one network is paired with node `i` of the other; marking a
//! node dependent sets its dependence value to `1`. Single-network sweeps do
//! not use these helpers.

use tracing::{debug, instrument};

use crate::{
    error::{PercolationError, Result},
    graph::Graph,
    rng::{UniformSource, uniform_index},
};

fn ensure_same_size(first: &Graph, second: &Graph) -> Result<()> {
    if first.len() != second.len() {
        return Err(PercolationError::GraphSizeMismatch {
            expected: first.len(),
            actual: second.len(),
        });
    }
    Ok(())
}

/// Marks every node of both networks as dependent.
///
/// # Errors
/// Returns [`PercolationError::GraphSizeMismatch`] when the networks differ
/// in size.
pub fn build_complete_dependence(first: &mut Graph, second: &mut Graph) -> Result<()> {
    ensure_same_size(first, second)?;
    for node in 0..first.len() {
        first.set_dependence(node, 1)?;
        second.set_dependence(node, 1)?;
    }
    Ok(())
}

/// Marks `floor(N * coupling)` distinct, previously independent nodes as
/// dependent in each network, chosen independently per network.
///
/// A coupling of exactly `1` delegates to [`build_complete_dependence`].
///
/// # Errors
/// Returns [`PercolationError::GraphSizeMismatch`] when the networks differ
/// in size and [`PercolationError::InvalidProbability`] when `coupling` is
/// outside `[0, 1]` or asks for more nodes than are still independent.
///
/// # Examples
/// ```
/// use percolate_core::{Graph, build_partial_dependence, seeded_rng};
///
/// let mut first = Graph::new(10);
/// let mut second = Graph::new(10);
/// build_partial_dependence(&mut first, &mut second, 0.4, &mut seeded_rng(2))?;
/// let dependent = (0..10).filter(|&n| first.dependence(n) == Ok(1)).count();
/// assert_eq!(dependent, 4);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
#[instrument(
    name = "graph.partial_dependence",
    err,
    skip(first, second, source),
    fields(nodes = first.len(), coupling = coupling),
)]
pub fn build_partial_dependence<S>(
    first: &mut Graph,
    second: &mut Graph,
    coupling: f64,
    source: &mut S,
) -> Result<()>
where
    S: UniformSource + ?Sized,
{
    ensure_same_size(first, second)?;
    if !(0.0..=1.0).contains(&coupling) {
        return Err(PercolationError::InvalidProbability {
            name: "coupling",
            range: "[0, 1]",
            value: coupling,
        });
    }
    if coupling >= 1.0 {
        return build_complete_dependence(first, second);
    }

    let target = (first.len() as f64 * coupling).floor() as usize;
    ensure_available(first, target, coupling)?;
    ensure_available(second, target, coupling)?;
    mark_dependent(first, target, source)?;
    mark_dependent(second, target, source)?;
    debug!(per_network = target, "partial dependence established");
    Ok(())
}

/// Fails unless `graph` still has `target` nodes without a dependency link.
fn ensure_available(graph: &Graph, target: usize, coupling: f64) -> Result<()> {
    let mut available = 0_usize;
    for node in 0..graph.len() {
        if graph.dependence(node)? == 0 {
            available += 1;
        }
    }
    if target > available {
        return Err(PercolationError::InvalidProbability {
            name: "coupling",
            range: "a fraction no larger than the independent share of nodes",
            value: coupling,
        });
    }
    Ok(())
}

fn mark_dependent<S>(graph: &mut Graph, target: usize, source: &mut S) -> Result<()>
where
    S: UniformSource + ?Sized,
{
    let mut chosen = 0_usize;
    while chosen < target {
        let node = uniform_index(source, graph.len());
        if graph.dependence(node)? == 0 {
            graph.set_dependence(node, 1)?;
            chosen += 1;
        }
    }
    Ok(())
}
