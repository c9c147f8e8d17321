//! # Optimizer Tests

use super::*;
use crate::domain::estimator::estimate_json_size;
use crate::domain::record::Recommendation;
use crate::test_utils::{make_control, make_metrics, make_recommendations};
use proptest::prelude::*;

const UNBOUNDED: usize = usize::MAX;

#[test]
fn test_keeps_top_50_of_300_by_max_score() {
    let optimizer = Optimizer::default();
    let metrics = make_metrics(300, 0);

    let optimized = optimizer.optimize_metrics(&metrics, UNBOUNDED);
    let score = optimized.secure_score.as_ref().unwrap();

    assert_eq!(score.control_scores.len(), 50);
    assert_eq!(score.total_controls_found, Some(300));
    assert_eq!(score.controls_stored_count, Some(50));

    let kept: Vec<f64> = score.control_scores.iter().map(|c| c.max_score).collect();
    let expected: Vec<f64> = (251..=300).rev().map(|v| v as f64).collect();
    assert_eq!(kept, expected);
}

#[test]
fn test_ties_keep_original_order() {
    let optimizer = Optimizer::new(OptimizerConfig {
        max_controls: 3,
        ..Default::default()
    });
    let mut metrics = make_metrics(0, 0);
    metrics.secure_score.as_mut().unwrap().control_scores = vec![
        make_control(0, 5.0),
        make_control(1, 9.0),
        make_control(2, 5.0),
        make_control(3, 5.0),
    ];

    let optimized = optimizer.optimize_metrics(&metrics, UNBOUNDED);
    let names: Vec<&str> = optimized.secure_score.as_ref().unwrap().control_scores
        .iter()
        .map(|c| c.control_name.as_str())
        .collect();

    assert!(names[0].starts_with("Control 1:"));
    assert!(names[1].starts_with("Control 0:"));
    assert!(names[2].starts_with("Control 2:"));
}

#[test]
fn test_aggregates_copied_through() {
    let optimizer = Optimizer::default();
    let metrics = make_metrics(120, 30);

    let optimized = optimizer.optimize_metrics(&metrics, 10);

    let before = metrics.secure_score.as_ref().unwrap();
    let after = optimized.secure_score.as_ref().unwrap();
    assert_eq!(after.current_score, before.current_score);
    assert_eq!(after.max_score, before.max_score);
    assert_eq!(after.percentage, before.percentage);

    let before = metrics.license.as_ref().unwrap();
    let after = optimized.license.as_ref().unwrap();
    assert_eq!(after.total_licenses, before.total_licenses);
    assert_eq!(after.assigned_licenses, before.assigned_licenses);
    assert_eq!(after.utilization_rate, before.utilization_rate);
}

#[test]
fn test_impossible_budget_leaves_aggregates_only() {
    let optimizer = Optimizer::default();
    let metrics = make_metrics(120, 30);

    let optimized = optimizer.optimize_metrics(&metrics, 10);

    assert!(optimized.secure_score.as_ref().unwrap().control_scores.is_empty());
    assert!(optimized.license.as_ref().unwrap().license_details.is_empty());
    assert_eq!(optimized.items_retained, Some(0));
    assert_eq!(optimized.total_items_found, Some(150));
    assert!(optimized.optimized);
}

#[test]
fn test_budget_halves_controls_before_dropping_licenses() {
    let optimizer = Optimizer::default();
    let metrics = make_metrics(50, 2);
    let full = optimizer.optimize_metrics(&metrics, UNBOUNDED);
    let full_size = estimate_json_size(&full).unwrap();

    let reduced = optimizer.optimize_metrics(&metrics, full_size - 1);
    let controls = reduced.secure_score.as_ref().unwrap().control_scores.len();

    assert_eq!(controls, 25);
    assert_eq!(reduced.license.as_ref().unwrap().license_details.len(), 2);
    assert!(estimate_json_size(&reduced).unwrap() < full_size);
}

#[test]
fn test_provenance_attached() {
    let optimizer = Optimizer::default();
    let metrics = make_metrics(80, 4);

    let optimized = optimizer.optimize_metrics(&metrics, UNBOUNDED);

    assert!(optimized.optimized);
    assert_eq!(optimized.total_items_found, Some(84));
    assert_eq!(optimized.items_retained, Some(54));
}

#[test]
fn test_second_pass_changes_nothing() {
    let optimizer = Optimizer::default();
    let metrics = make_metrics(300, 40);
    let budget = 6_000;

    let once = optimizer.optimize_metrics(&metrics, budget);
    let twice = optimizer.optimize_metrics(&once, budget);

    assert_eq!(once, twice);
}

#[test]
fn test_control_fields_truncated() {
    let optimizer = Optimizer::default();
    let mut metrics = make_metrics(0, 0);
    let mut control = make_control(0, 1.0);
    control.control_name = "n".repeat(300);
    control.category = "c".repeat(80);
    control.implementation_status = "s".repeat(51);
    metrics.secure_score.as_mut().unwrap().control_scores = vec![control];

    let optimized = optimizer.optimize_metrics(&metrics, UNBOUNDED);
    let kept = &optimized.secure_score.as_ref().unwrap().control_scores[0];

    assert_eq!(kept.control_name.chars().count(), 100);
    assert!(kept.control_name.ends_with("..."));
    assert_eq!(kept.category.chars().count(), 50);
    assert_eq!(kept.implementation_status.chars().count(), 50);
}

#[test]
fn test_recommendations_filtered_capped_truncated() {
    let optimizer = Optimizer::default();
    let mut recommendations = vec![
        Recommendation::default(),
        Recommendation {
            title: Some(String::new()),
            description: Some("  ".to_string()),
            ..Default::default()
        },
    ];
    recommendations.extend(make_recommendations(14));
    recommendations[2].description = Some("d".repeat(900));

    let optimized = optimizer.optimize_recommendations(&recommendations);

    assert_eq!(optimized.len(), 10);
    assert_eq!(optimized[0].title.as_deref(), Some("Recommendation 0"));
    assert_eq!(
        optimized[0].description.as_ref().unwrap().chars().count(),
        500
    );
    assert_eq!(optimized[9].title.as_deref(), Some("Recommendation 9"));
}

#[test]
fn test_missing_blocks_stay_missing() {
    let optimizer = Optimizer::default();
    let optimized = optimizer.optimize_metrics(&Metrics::default(), UNBOUNDED);

    assert!(optimized.secure_score.is_none());
    assert!(optimized.license.is_none());
    assert_eq!(optimized.total_items_found, Some(0));
}

#[test]
fn test_truncate_chars_multibyte() {
    assert_eq!(truncate_chars("ééééé", 5), "ééééé");
    assert_eq!(truncate_chars("éééééé", 5), "éé...");
    assert_eq!(truncate_chars("abcdef", 2), "ab");
}

proptest! {
    #[test]
    fn prop_optimizer_idempotent_and_non_increasing(
        scores in proptest::collection::vec(0u16..500, 0..200),
        budget in 200usize..20_000,
    ) {
        let optimizer = Optimizer::default();
        let mut metrics = make_metrics(0, 3);
        metrics.secure_score.as_mut().unwrap().control_scores = scores
            .iter()
            .enumerate()
            .map(|(i, s)| make_control(i, *s as f64))
            .collect();

        let once = optimizer.optimize_metrics(&metrics, budget);
        let twice = optimizer.optimize_metrics(&once, budget);

        prop_assert!(estimate_json_size(&twice).unwrap() <= estimate_json_size(&once).unwrap());
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(
            once.secure_score.as_ref().unwrap().current_score,
            metrics.secure_score.as_ref().unwrap().current_score
        );
    }
}

#[test]
fn test_budget_measured_with_supplied_measure() {
    let optimizer = Optimizer::default();
    let metrics = make_metrics(50, 0);
    let compact = optimizer.optimize_metrics(&metrics, UNBOUNDED);
    let compact_size = estimate_json_size(&compact).unwrap();

    // A serialization twice as long as compact JSON must be halved to fit.
    let doubled = |m: &Metrics| estimate_json_size(m).ok().map(|size| size * 2);
    let reduced = optimizer.optimize_metrics_with(&metrics, compact_size, doubled);

    assert!(estimate_json_size(&reduced).unwrap() * 2 <= compact_size);
    assert_eq!(
        reduced.items_retained,
        Some(reduced.secure_score.as_ref().unwrap().control_scores.len())
    );
}

#[test]
fn test_markers_set_before_measuring() {
    let optimizer = Optimizer::default();
    let mut metrics = make_metrics(50, 2);
    metrics.compressed = true;
    let full = optimizer.optimize_metrics(&metrics, UNBOUNDED);
    let full_size = estimate_json_size(&full).unwrap();

    let fitted = optimizer.optimize_metrics(&metrics, full_size);

    assert!(fitted.compressed);
    assert_eq!(fitted, full);
}
