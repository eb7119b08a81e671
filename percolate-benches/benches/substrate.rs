//! Substrate construction benchmarks.
//!
//! Measures building an Erdős–Rényi substrate and assigning thresholds,
//! the one-off cost paid before a sweep starts.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use percolate_benches::{
    error::BenchSetupError, params::SubstrateBenchParams, substrate::prepared_experiment,
};

/// Substrate sizes to benchmark.
const NODE_COUNTS: &[usize] = &[10_000, 100_000];

/// Mean degree used by the classic sweep.
const MEAN_DEGREE: f64 = 10.0;

fn substrate_build_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("substrate_build");
    group.sample_size(10);

    for &node_count in NODE_COUNTS {
        let params = SubstrateBenchParams {
            node_count,
            mean_degree: MEAN_DEGREE,
        };
        // Fail setup once up front rather than inside the timed loop.
        prepared_experiment(params)?;

        group.bench_with_input(
            BenchmarkId::from_parameter(params),
            &params,
            |b, &params| {
                b.iter(|| prepared_experiment(params));
            },
        );
    }

    group.finish();
    Ok(())
}

fn substrate_build(c: &mut Criterion) {
    if let Err(err) = substrate_build_impl(c) {
        panic!("substrate_build benchmark setup failed: {err}");
    }
}

criterion_group!(benches, substrate_build);
criterion_main!(benches);
