//! Iterative heterogeneous k-core pruning.
//!
//! Each pass scans every node and isolates those whose positive degree has
//! fallen below their threshold. Passes repeat until one removes nothing.
//! Removal only ever lowers degrees, so the surviving edge set is the unique
//! heterogeneous k-core whatever the scan order; the order only changes how
//! many passes it takes to get there.

use tracing::{debug, instrument, trace};

use crate::{
    error::{PercolationError, Result},
    graph::Graph,
};

/// Summary of a [`prune_to_kcore`] run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PruneOutcome {
    removals_per_pass: Vec<usize>,
}

impl PruneOutcome {
    /// Returns the number of full scans performed, including the final scan
    /// that removed nothing. Always at least `1`.
    #[must_use]
    pub fn passes(&self) -> usize {
        self.removals_per_pass.len()
    }

    /// Returns how many nodes were isolated across all passes.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.removals_per_pass.iter().sum()
    }

    /// Returns the number of nodes isolated in each pass. The last entry is
    /// always `0`.
    #[must_use]
    pub fn removals_per_pass(&self) -> &[usize] {
        &self.removals_per_pass
    }
}

/// Prunes `graph` to its heterogeneous k-core, scanning in identifier order.
///
/// A node is isolated when `0 < degree < threshold` and it is not
/// protected. Isolated nodes are never revisited.
///
/// # Errors
/// Propagates invariant violations from [`Graph::remove_node`] and returns
/// [`PercolationError::NonConvergence`] if the pass count exceeds `N + 1`,
/// which monotone removal makes impossible on an uncorrupted graph.
///
/// # Examples
/// ```
/// use percolate_core::{Graph, prune_to_kcore};
///
/// let mut path = Graph::new(5);
/// for node in 0..4 {
///     path.insert_edge(node, node + 1)?;
/// }
/// for node in 0..5 {
///     path.set_threshold(node, 2)?;
/// }
/// // Scanning in identifier order, removing node 0 exposes node 1 within
/// // the same pass, so the whole path collapses before the confirming scan.
/// let outcome = prune_to_kcore(&mut path)?;
/// assert_eq!(outcome.removals_per_pass(), &[4, 0]);
/// assert_eq!(path.edge_count(), 0);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
#[instrument(name = "perco.prune", err, skip(graph), fields(nodes = graph.len()))]
pub fn prune_to_kcore(graph: &mut Graph) -> Result<PruneOutcome> {
    let node_count = graph.len();
    run_passes(graph, 0..node_count)
}

/// Prunes `graph` scanning nodes in the caller-supplied `order` on every
/// pass.
///
/// The final edge set matches [`prune_to_kcore`]; only the pass count may
/// differ.
///
/// # Examples
/// ```
/// use percolate_core::{Graph, prune_in_order};
///
/// let mut path = Graph::new(5);
/// for node in 0..4 {
///     path.insert_edge(node, node + 1)?;
/// }
/// for node in 0..5 {
///     path.set_threshold(node, 2)?;
/// }
/// // Centre first: the path is peeled from both ends, one layer per pass.
/// let outcome = prune_in_order(&mut path, &[2, 1, 3, 0, 4])?;
/// assert_eq!(outcome.removals_per_pass(), &[2, 2, 0]);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
///
/// # Errors
/// Returns [`PercolationError::InvalidScanOrder`] unless `order` is a
/// permutation of `0..N`, plus everything [`prune_to_kcore`] can return.
#[instrument(name = "perco.prune", err, skip(graph, order), fields(nodes = graph.len()))]
pub fn prune_in_order(graph: &mut Graph, order: &[usize]) -> Result<PruneOutcome> {
    validate_order(graph.len(), order)?;
    run_passes(graph, order.iter().copied())
}

fn validate_order(node_count: usize, order: &[usize]) -> Result<()> {
    if order.len() != node_count {
        return Err(PercolationError::InvalidScanOrder {
            node_count,
            reason: format!("expected {node_count} entries, found {}", order.len()),
        });
    }
    let mut seen = vec![false; node_count];
    for &node in order {
        let Some(slot) = seen.get_mut(node) else {
            return Err(PercolationError::InvalidScanOrder {
                node_count,
                reason: format!("node {node} is out of bounds"),
            });
        };
        if *slot {
            return Err(PercolationError::InvalidScanOrder {
                node_count,
                reason: format!("node {node} appears more than once"),
            });
        }
        *slot = true;
    }
    Ok(())
}

fn run_passes<I>(graph: &mut Graph, order: I) -> Result<PruneOutcome>
where
    I: Iterator<Item = usize> + Clone,
{
    let node_count = graph.len();
    let max_passes = node_count.saturating_add(1);
    let mut removals_per_pass = Vec::new();

    loop {
        let pass = removals_per_pass.len() + 1;
        if pass > max_passes {
            return Err(PercolationError::NonConvergence {
                passes: pass,
                node_count,
            });
        }

        let mut removed_this_pass = 0_usize;
        for node in order.clone() {
            if should_prune(graph, node)? {
                graph.remove_node(node)?;
                removed_this_pass += 1;
            }
        }
        trace!(pass, removed = removed_this_pass, "pruning pass complete");
        removals_per_pass.push(removed_this_pass);
        if removed_this_pass == 0 {
            break;
        }
    }

    let outcome = PruneOutcome { removals_per_pass };
    let passes = outcome.passes();
    let removed = outcome.removed();

    #[cfg(feature = "metrics")]
    {
        metrics::histogram!("percolate_prune_passes").record(passes as f64);
        metrics::counter!("percolate_pruned_nodes").increment(removed as u64);
    }

    debug!(passes, removed, "pruning converged");
    Ok(outcome)
}

fn should_prune(graph: &Graph, node: usize) -> Result<bool> {
    let degree = graph.degree(node)?;
    Ok(degree > 0 && degree < graph.threshold(node)? && !graph.is_protected(node)?)
}
