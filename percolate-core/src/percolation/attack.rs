//! Random node attack realising an occupation probability.

use tracing::{debug, instrument};

use crate::{
    error::{PercolationError, Result},
    graph::Graph,
    rng::{UniformSource, uniform_index},
};

/// Record of a single [`random_attack`] call.
///
/// Production sweeps only need the counts; the per-node marker lets tests
/// confirm exactly which identifiers were selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackOutcome {
    attacked: Vec<bool>,
    target: usize,
    isolated: usize,
    draws: u64,
}

impl AttackOutcome {
    /// Returns the number of distinct nodes selected, `floor((1 - p) * N)`.
    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Returns how many selected nodes still had edges and were isolated.
    #[must_use]
    pub fn isolated(&self) -> usize {
        self.isolated
    }

    /// Returns how many identifiers were drawn, including repeats.
    #[must_use]
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Returns whether `node` was selected.
    #[must_use]
    pub fn was_attacked(&self, node: usize) -> bool {
        self.attacked.get(node).copied().unwrap_or(false)
    }

    /// Iterates the selected identifiers in ascending order.
    pub fn attacked_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.attacked
            .iter()
            .enumerate()
            .filter_map(|(node, &hit)| hit.then_some(node))
    }
}

/// Returns the number of nodes an attack with occupation `occupation`
/// selects on `node_count` nodes.
#[must_use]
pub fn attack_target(occupation: f64, node_count: usize) -> usize {
    ((1.0 - occupation) * node_count as f64) as usize
}

/// Disables `floor((1 - occupation) * N)` distinct, uniformly chosen nodes.
///
/// Identifiers are drawn until that many distinct nodes have been selected;
/// repeats are discarded. A selected node with edges is isolated via
/// [`Graph::remove_node`]. A selected node that is already isolated, or is
/// protected, still counts toward the target, so the attacked fraction is
/// always measured against all `N` nodes.
///
/// # Errors
/// Returns [`PercolationError::InvalidProbability`] unless `occupation` lies
/// in `(0, 1]`, and propagates invariant violations from node removal.
///
/// # Examples
/// ```
/// use percolate_core::{Graph, random_attack, seeded_rng};
///
/// let mut graph = Graph::new(10);
/// let outcome = random_attack(&mut graph, 0.7, &mut seeded_rng(1))?;
/// assert_eq!(outcome.target(), 3);
/// assert_eq!(outcome.attacked_nodes().count(), 3);
/// assert_eq!(outcome.isolated(), 0);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
#[instrument(
    name = "perco.attack",
    err,
    skip(graph, source),
    fields(nodes = graph.len(), occupation = occupation),
)]
pub fn random_attack<S>(graph: &mut Graph, occupation: f64, source: &mut S) -> Result<AttackOutcome>
where
    S: UniformSource + ?Sized,
{
    if !(occupation > 0.0 && occupation <= 1.0) {
        return Err(PercolationError::InvalidProbability {
            name: "occupation probability",
            range: "(0, 1]",
            value: occupation,
        });
    }

    let node_count = graph.len();
    let target = attack_target(occupation, node_count);
    let mut attacked = vec![false; node_count];
    let mut selected = 0_usize;
    let mut isolated = 0_usize;
    let mut draws = 0_u64;

    while selected < target {
        let node = uniform_index(source, node_count);
        draws += 1;
        let Some(mark) = attacked.get_mut(node) else {
            continue;
        };
        if *mark {
            continue;
        }
        *mark = true;
        selected += 1;
        if graph.degree(node)? > 0 && !graph.is_protected(node)? {
            graph.remove_node(node)?;
            isolated += 1;
        }
    }

    #[cfg(feature = "metrics")]
    metrics::counter!("percolate_attack_isolated_nodes").increment(isolated as u64);

    debug!(attacked = target, isolated, draws, "attack complete");
    Ok(AttackOutcome {
        attacked,
        target,
        isolated,
        draws,
    })
}
