//! Spans and events emitted while building and sweeping an experiment.

use percolate_core::{ExperimentBuilder, PercolationError, Sweep, ThresholdAssigner};
use rstest::rstest;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use percolate_test_support::tracing::RecordingLayer;

fn record_sweep(layer: &RecordingLayer) -> Result<usize, PercolationError> {
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || {
        let mut experiment = ExperimentBuilder::new()
            .with_node_count(300)
            .with_mean_degree(5.0)
            .with_thresholds(ThresholdAssigner::new(3, 0.5, 2)?)
            .with_seed(3)
            .with_sweep(Sweep::new(1.0, 0.5, 0.5)?)
            .build()?;
        Ok(experiment.run_sweep()?.len())
    })
}

#[rstest]
fn sweep_emits_one_span_per_stage() -> Result<(), PercolationError> {
    let layer = RecordingLayer::default();
    let trials = record_sweep(&layer)?;
    assert_eq!(trials, 2);

    let names = layer.span_names();
    for expected in [
        "graph.build",
        "graph.assign_thresholds",
        "experiment.sweep",
        "experiment.trial",
        "perco.attack",
        "perco.prune",
        "perco.largest_component",
    ] {
        assert!(
            names.iter().any(|name| name == expected),
            "missing span {expected}: {names:?}"
        );
    }
    let trial_spans = names.iter().filter(|name| *name == "experiment.trial").count();
    assert_eq!(trial_spans, 2);
    Ok(())
}

#[rstest]
fn spans_carry_configuration_fields() -> Result<(), PercolationError> {
    let layer = RecordingLayer::default();
    record_sweep(&layer)?;

    let build = layer.span("graph.build").expect("build span");
    assert_eq!(build.field("nodes"), Some("300"));
    assert_eq!(build.field("mean_degree"), Some("5"));

    let sweep = layer.span("experiment.sweep").expect("sweep span");
    assert_eq!(sweep.field("trials"), Some("2"));

    let trial = layer.span("experiment.trial").expect("trial span");
    assert_eq!(trial.field("occupation"), Some("1"));
    Ok(())
}

#[rstest]
fn each_trial_reports_at_info() -> Result<(), PercolationError> {
    let layer = RecordingLayer::default();
    record_sweep(&layer)?;

    let info = layer.events_at(Level::INFO);
    assert!(info.iter().any(|event| {
        event.message() == Some("substrate ready") && event.field("edges") == Some("750")
    }));

    let trials: Vec<_> = info
        .iter()
        .filter(|event| event.message() == Some("trial complete"))
        .collect();
    assert_eq!(trials.len(), 2);
    assert_eq!(trials[0].field("attacked"), Some("0"));
    assert_eq!(trials[1].field("attacked"), Some("150"));
    assert!(layer.events_at(Level::ERROR).is_empty());
    Ok(())
}
