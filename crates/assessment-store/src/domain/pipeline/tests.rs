//! # Pipeline Tests

use super::*;
use crate::domain::chunking::{chunk_count_key, chunk_key};
use crate::domain::errors::StoreError;
use crate::domain::fallback::build_fallback_record;
use crate::domain::record::AssessmentStatus;
use crate::test_utils::make_record;

const PARTITION: &str = "assessments";

fn payload(metrics_len: usize, recommendations_len: usize) -> EncodedPayload {
    EncodedPayload {
        metrics: "m".repeat(metrics_len),
        recommendations: "r".repeat(recommendations_len),
    }
}

// =========================================================================
// State transitions
// =========================================================================

#[test]
fn test_direct_advances_to_optimized() {
    assert_eq!(
        next_stage(WriteStage::Direct, StageOutcome::OverFieldBudget),
        WriteStage::Optimized
    );
    assert_eq!(
        next_stage(WriteStage::Direct, StageOutcome::Rejected),
        WriteStage::Optimized
    );
}

#[test]
fn test_optimized_transitions() {
    assert_eq!(
        next_stage(WriteStage::Optimized, StageOutcome::OverFieldBudget),
        WriteStage::Chunked
    );
    assert_eq!(
        next_stage(WriteStage::Optimized, StageOutcome::OverChunkCeiling),
        WriteStage::Fallback
    );
    assert_eq!(
        next_stage(WriteStage::Optimized, StageOutcome::Rejected),
        WriteStage::Fallback
    );
}

#[test]
fn test_chunked_and_fallback_failures() {
    assert_eq!(
        next_stage(WriteStage::Chunked, StageOutcome::Rejected),
        WriteStage::Fallback
    );
    assert_eq!(
        next_stage(WriteStage::Fallback, StageOutcome::Rejected),
        WriteStage::Failed
    );
    assert_eq!(
        next_stage(WriteStage::Failed, StageOutcome::Rejected),
        WriteStage::Failed
    );
    assert!(WriteStage::Failed.is_terminal());
}

#[test]
fn test_every_path_terminates_within_four_steps() {
    let outcomes = [
        StageOutcome::OverFieldBudget,
        StageOutcome::OverChunkCeiling,
        StageOutcome::Rejected,
    ];
    for outcome in outcomes {
        let mut stage = WriteStage::Direct;
        for _ in 0..4 {
            stage = next_stage(stage, outcome);
        }
        assert_eq!(stage, WriteStage::Failed, "outcome {:?}", outcome);
    }
}

#[test]
fn test_stored_status_truthful() {
    use AssessmentStatus::*;
    assert_eq!(stored_status(Completed, WriteStage::Direct), Completed);
    assert_eq!(
        stored_status(Completed, WriteStage::Optimized),
        CompletedWithSizeLimit
    );
    assert_eq!(
        stored_status(Completed, WriteStage::Chunked),
        CompletedWithSizeLimit
    );
    assert_eq!(stored_status(Error, WriteStage::Chunked), Error);
}

// =========================================================================
// Planning
// =========================================================================

#[test]
fn test_overflow_classification() {
    assert_eq!(payload(100, 100).overflow(100, 3), None);
    assert_eq!(
        payload(300, 10).overflow(100, 3),
        Some(StageOutcome::OverFieldBudget)
    );
    assert_eq!(
        payload(10, 301).overflow(100, 3),
        Some(StageOutcome::OverChunkCeiling)
    );
}

#[test]
fn test_unchunked_plan_layout() {
    let record = make_record("a-1", 1, 0);
    let plan = plan_unchunked(
        PARTITION,
        &record,
        &payload(10, 5),
        AssessmentStatus::Completed,
        100,
        3,
    )
    .unwrap();

    let entity = &plan.entity;
    assert_eq!(entity.partition_key, PARTITION);
    assert_eq!(entity.row_key, "a-1");
    assert_eq!(entity.get_bool("metrics_isChunked"), Some(false));
    assert_eq!(entity.get_str("metrics"), Some("mmmmmmmmmm"));
    assert_eq!(entity.get_str("recommendations"), Some("rrrrr"));
    assert_eq!(entity.get_str(fields::STATUS), Some("completed"));
    assert_eq!(plan.chunks_used, 0);
}

#[test]
fn test_unchunked_plan_refuses_oversized() {
    let record = make_record("a-1", 1, 0);
    let result = plan_unchunked(
        PARTITION,
        &record,
        &payload(101, 5),
        AssessmentStatus::Completed,
        100,
        3,
    );
    assert_eq!(result, Err(StageOutcome::OverFieldBudget));
}

#[test]
fn test_chunked_plan_chunks_independently() {
    let record = make_record("a-1", 1, 0);
    let plan = plan_chunked(
        PARTITION,
        &record,
        &payload(250, 40),
        AssessmentStatus::CompletedWithSizeLimit,
        100,
        3,
    )
    .unwrap();

    let entity = &plan.entity;
    assert_eq!(plan.chunks_used, 3);
    assert_eq!(entity.get_bool("metrics_isChunked"), Some(true));
    assert_eq!(entity.get_i64(&chunk_count_key("metrics")), Some(3));
    assert_eq!(entity.get_str(&chunk_key("metrics", 2)).map(str::len), Some(50));
    assert!(!entity.contains("metrics"));
    assert_eq!(entity.get_bool("recommendations_isChunked"), Some(false));
    assert_eq!(entity.get_str(fields::STATUS), Some("completed_with_size_limit"));
    for (_, value) in entity.properties() {
        assert!(value.char_len() <= 100);
    }
}

#[test]
fn test_chunked_plan_respects_ceiling() {
    let record = make_record("a-1", 1, 0);
    let result = plan_chunked(
        PARTITION,
        &record,
        &payload(401, 1),
        AssessmentStatus::CompletedWithSizeLimit,
        100,
        4,
    );
    assert_eq!(result, Err(StageOutcome::OverChunkCeiling));
}

#[test]
fn test_fallback_plan_is_minimal() {
    let record = make_record("a-1", 300, 50);
    let fallback = build_fallback_record(&record, "chunked write rejected");
    let plan = plan_fallback(PARTITION, &fallback);

    assert_eq!(plan.entity.property_count(), 7);
    assert_eq!(plan.status, AssessmentStatus::CompletedWithSizeLimit);
    assert_eq!(
        plan.entity.get_str(fields::DIAGNOSTIC),
        Some("chunked write rejected")
    );
    assert!(!plan.entity.contains("metrics"));
}

#[test]
fn test_size_limited_marker() {
    let record = make_record("a-1", 1, 0).with_status(AssessmentStatus::Error);
    let mut plan = plan_fallback(PARTITION, &build_fallback_record(&record, "rejected"));
    assert!(!is_size_limited(&plan.entity));

    plan.mark_size_limited();
    assert!(is_size_limited(&plan.entity));
    assert_eq!(plan.status, AssessmentStatus::Error);
    assert_eq!(decode_header(&plan.entity).0.status, AssessmentStatus::Error);
}

#[test]
fn test_stale_properties_after_shrink() {
    let record = make_record("a-1", 1, 0);
    let large = plan_chunked(
        PARTITION,
        &record,
        &payload(450, 10),
        AssessmentStatus::CompletedWithSizeLimit,
        100,
        10,
    )
    .unwrap();
    let small = plan_unchunked(
        PARTITION,
        &record,
        &payload(20, 10),
        AssessmentStatus::Completed,
        100,
        10,
    )
    .unwrap();

    let mut stale = stale_properties(&large.entity, &small.entity);
    stale.sort();

    let mut expected: Vec<String> = (0..5).map(|i| chunk_key("metrics", i)).collect();
    expected.push(chunk_count_key("metrics"));
    expected.sort();
    assert_eq!(stale, expected);
}

// =========================================================================
// Decoding
// =========================================================================

#[test]
fn test_decode_chunked_and_single_fields() {
    let record = make_record("a-1", 1, 0);
    let original = payload(250, 40);
    let plan = plan_chunked(
        PARTITION,
        &record,
        &original,
        AssessmentStatus::CompletedWithSizeLimit,
        100,
        3,
    )
    .unwrap();

    let metrics = decode_field(&plan.entity, ChunkableField::Metrics);
    let recommendations = decode_field(&plan.entity, ChunkableField::Recommendations);

    assert_eq!(metrics.text.as_deref(), Some(original.metrics.as_str()));
    assert!(metrics.diagnostic.is_none());
    assert_eq!(
        recommendations.text.as_deref(),
        Some(original.recommendations.as_str())
    );
}

#[test]
fn test_decode_reports_missing_chunk() {
    let record = make_record("a-1", 1, 0);
    let mut plan = plan_chunked(
        PARTITION,
        &record,
        &payload(250, 40),
        AssessmentStatus::CompletedWithSizeLimit,
        100,
        3,
    )
    .unwrap();
    plan.entity.remove(&chunk_key("metrics", 0));

    let decoded = decode_field(&plan.entity, ChunkableField::Metrics);
    assert_eq!(decoded.text.map(|t| t.len()), Some(150));
    assert!(matches!(
        decoded.diagnostic,
        Some(StoreError::IncompleteChunkSet { .. })
    ));
}

#[test]
fn test_decode_header_roundtrip() {
    let record = make_record("a-1", 1, 0);
    let entity = header_entity(PARTITION, &record, AssessmentStatus::Completed);

    let (decoded, diagnostic) = decode_header(&entity);
    assert!(diagnostic.is_none());
    assert_eq!(decoded.id, record.id);
    assert_eq!(decoded.customer_id, record.customer_id);
    assert_eq!(decoded.tenant_id, record.tenant_id);
    assert_eq!(decoded.timestamp, record.timestamp);
    assert_eq!(decoded.score, record.score);
    assert_eq!(decoded.status, AssessmentStatus::Completed);
}

#[test]
fn test_decode_header_unknown_status() {
    let record = make_record("a-1", 1, 0);
    let mut entity = header_entity(PARTITION, &record, AssessmentStatus::Completed);
    entity.insert(fields::STATUS, "archived");

    let (decoded, diagnostic) = decode_header(&entity);
    assert_eq!(decoded.status, AssessmentStatus::Error);
    assert!(matches!(diagnostic, Some(StoreError::Serialization { .. })));
}
