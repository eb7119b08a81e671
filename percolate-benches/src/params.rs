//! Benchmark parameter types.

use std::fmt;

/// Parameters for a substrate benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct SubstrateBenchParams {
    /// Number of nodes in the substrate.
    pub node_count: usize,
    /// Mean degree of the substrate.
    pub mean_degree: f64,
}

impl fmt::Display for SubstrateBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},c={}", self.node_count, self.mean_degree)
    }
}

/// Parameters for a single-trial benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct TrialBenchParams {
    /// Number of nodes in the substrate.
    pub node_count: usize,
    /// Occupation probability of the trial.
    pub occupation: f64,
}

impl fmt::Display for TrialBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},p={}", self.node_count, self.occupation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(10_000, 10.0, "n=10000,c=10")]
    #[case(500, 2.5, "n=500,c=2.5")]
    fn substrate_params_render_compactly(
        #[case] node_count: usize,
        #[case] mean_degree: f64,
        #[case] expected: &str,
    ) {
        let params = SubstrateBenchParams {
            node_count,
            mean_degree,
        };
        assert_eq!(params.to_string(), expected);
    }

    #[test]
    fn trial_params_render_compactly() {
        let params = TrialBenchParams {
            node_count: 1_000,
            occupation: 0.75,
        };
        assert_eq!(params.to_string(), "n=1000,p=0.75");
    }
}
