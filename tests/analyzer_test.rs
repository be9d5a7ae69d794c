//! Library-level tests over the fixture operator module
//!
//! The fixture tree is read in place; nothing is written to it.

use controller_survey::analyzer::{Analyzer, AnalyzerOptions};
use controller_survey::models::{AnalysisResult, Classification, SignalKind};
use controller_survey::reporters::Summary;
use std::path::PathBuf;

fn operator_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/operator")
}

fn analyze(options: AnalyzerOptions) -> Vec<AnalysisResult> {
    let analyzer = Analyzer::new(options).expect("thread pool");
    analyzer
        .analyze_dir(&operator_fixture(), "acme/operator")
        .expect("analyze fixture")
}

fn find<'a>(results: &'a [AnalysisResult], receiver: &str) -> &'a AnalysisResult {
    results
        .iter()
        .find(|r| r.receiver_type == receiver)
        .unwrap_or_else(|| panic!("no result for {receiver}"))
}

fn kinds_and_lines(result: &AnalysisResult) -> Vec<(SignalKind, u32)> {
    result.signals.iter().map(|s| (s.kind, s.line)).collect()
}

#[test]
fn test_default_run_finds_production_reconcilers() {
    let results = analyze(AnalyzerOptions::default());
    let receivers: Vec<_> = results.iter().map(|r| r.receiver_type.as_str()).collect();
    assert_eq!(
        receivers,
        vec![
            "GadgetReconciler",
            "InventoryReconciler",
            "SweepReconciler",
            "WidgetReconciler",
            "Janitor"
        ]
    );
}

#[test]
fn test_request_scoped_reconciler_is_mostly_edge() {
    let results = analyze(AnalyzerOptions::default());
    let widget = find(&results, "WidgetReconciler");

    assert_eq!(widget.id, "acme/operator#controllers/widget_controller.go#16");
    assert_eq!(widget.file, "controllers/widget_controller.go");
    assert_eq!((widget.line, widget.end_line), (16, 23));
    assert_eq!(widget.receiver_package, "example.com/operator/controllers");
    assert_eq!(
        kinds_and_lines(widget),
        vec![
            (SignalKind::RequestScopedGet, 18),
            (SignalKind::NotfoundIgnore, 19)
        ]
    );
    assert_eq!(widget.score, -2);
    assert_eq!(widget.classification, Classification::MostlyEdge);
    assert!(widget.signals[0].snippet.contains("req.NamespacedName"));
    assert!(widget.signals[1].snippet.starts_with("if apierrors.IsNotFound(err)"));
}

#[test]
fn test_unscoped_list_is_mostly_sotw() {
    let results = analyze(AnalyzerOptions::default());
    let inventory = find(&results, "InventoryReconciler");
    assert_eq!(
        kinds_and_lines(inventory),
        vec![(SignalKind::UnscopedList, 16)]
    );
    assert_eq!(inventory.score, 3);
    assert_eq!(inventory.classification, Classification::MostlySotw);
}

#[test]
fn test_list_then_write_loop_is_sotw() {
    let results = analyze(AnalyzerOptions::default());
    let sweep = find(&results, "SweepReconciler");
    assert_eq!(
        kinds_and_lines(sweep),
        vec![
            (SignalKind::UnscopedList, 16),
            (SignalKind::LoopWrite, 19),
            (SignalKind::SingleWrite, 20)
        ]
    );
    assert_eq!(sweep.score, 5);
    assert_eq!(sweep.classification, Classification::Sotw);
    assert_eq!(sweep.end_line, 25);
}

#[test]
fn test_namespace_list_and_derived_get() {
    let results = analyze(AnalyzerOptions::default());
    let gadget = find(&results, "GadgetReconciler");
    assert_eq!(
        kinds_and_lines(gadget),
        vec![
            (SignalKind::NamespaceScopedList, 18),
            (SignalKind::DerivedGet, 22),
            (SignalKind::NotfoundEarlyReturn, 23)
        ]
    );
    assert_eq!(gadget.score, -2);
}

#[test]
fn test_aliased_signature_matched_through_resolver() {
    let results = analyze(AnalyzerOptions::default());
    let janitor = find(&results, "Janitor");
    assert_eq!(janitor.receiver_package, "example.com/operator/internal/legacy");
    assert_eq!(
        kinds_and_lines(janitor),
        vec![
            (SignalKind::LabelScopedList, 19),
            (SignalKind::LoopWrite, 22),
            (SignalKind::SingleWrite, 23)
        ]
    );
    assert_eq!(janitor.score, 2);
    assert_eq!(janitor.classification, Classification::MostlySotw);

    let without = analyze(AnalyzerOptions {
        use_resolver: false,
        ..Default::default()
    });
    assert_eq!(without.len(), 4);
    assert!(without.iter().all(|r| r.receiver_type != "Janitor"));
}

#[test]
fn test_include_tests_and_vendor_excludes() {
    let with_tests = analyze(AnalyzerOptions {
        include_tests: true,
        ..Default::default()
    });
    assert_eq!(with_tests.len(), 6);
    assert!(with_tests
        .iter()
        .any(|r| r.file == "controllers/widget_controller_test.go"));

    let everything = analyze(AnalyzerOptions {
        include_tests: true,
        exclude: vec![],
        ..Default::default()
    });
    assert_eq!(everything.len(), 7);
    assert!(everything
        .iter()
        .any(|r| r.file.starts_with("vendor/")));
}

#[test]
fn test_repeated_runs_are_identical() {
    let first = serde_json::to_string(&analyze(AnalyzerOptions::default())).unwrap();
    for workers in [1, 4] {
        let again = analyze(AnalyzerOptions {
            workers,
            ..Default::default()
        });
        assert_eq!(serde_json::to_string(&again).unwrap(), first);
    }
}

#[test]
fn test_summary_over_fixture() {
    let results = analyze(AnalyzerOptions::default());
    let summary = Summary::generate(&results, 2);
    assert_eq!(summary.total_reconcilers, 5);
    assert_eq!(summary.count(Classification::Sotw), 1);
    assert_eq!(summary.count(Classification::MostlySotw), 2);
    assert_eq!(summary.count(Classification::MostlyEdge), 2);
    assert!((summary.average_score - 1.2).abs() < 1e-9);
    assert_eq!(summary.top_sotw[0].receiver_type, "SweepReconciler");
    assert_eq!(summary.top_edge.len(), 2);
    assert_eq!(summary.signal_frequency.get(&SignalKind::LoopWrite), Some(&2));
}
