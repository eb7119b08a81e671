use percolate_core::{Graph, PercolationError, UniformSource};

/// Replays a fixed list of deviates, cycling once exhausted.
pub struct Replay {
    values: Vec<f64>,
    cursor: usize,
}

impl Replay {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "replay needs at least one value");
        Self { values, cursor: 0 }
    }
}

impl UniformSource for Replay {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

pub fn graph_with_edges(
    node_count: usize,
    edges: &[(usize, usize)],
) -> Result<Graph, PercolationError> {
    let mut graph = Graph::new(node_count);
    for &(left, right) in edges {
        graph.insert_edge(left, right)?;
    }
    Ok(graph)
}

pub fn uniform_thresholds(graph: &mut Graph, threshold: usize) -> Result<(), PercolationError> {
    for node in 0..graph.len() {
        graph.set_threshold(node, threshold)?;
    }
    Ok(())
}
