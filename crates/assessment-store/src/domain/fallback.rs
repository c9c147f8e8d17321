//! # Fallback Records
//!
//! Last-resort representation written when neither the optimized nor the
//! chunked form fits. It keeps identifiers, timestamp, status, the aggregate
//! score and a short diagnostic, and nothing else.

use crate::domain::optimizer::truncate_chars;
use crate::domain::record::{AssessmentRecord, AssessmentStatus, Metrics};

/// Longest diagnostic stored on a fallback record.
pub const MAX_DIAGNOSTIC_LEN: usize = 256;

/// Build the minimal record for `record`.
///
/// An `error` assessment stays `error`; everything else becomes
/// `completed_with_size_limit`.
pub fn build_fallback_record(record: &AssessmentRecord, reason: &str) -> AssessmentRecord {
    let status = match record.status {
        AssessmentStatus::Error => AssessmentStatus::Error,
        _ => AssessmentStatus::CompletedWithSizeLimit,
    };

    AssessmentRecord {
        id: record.id.clone(),
        customer_id: record.customer_id.clone(),
        tenant_id: record.tenant_id.clone(),
        timestamp: record.timestamp,
        status,
        score: record.score,
        metrics: Metrics::default(),
        recommendations: Vec::new(),
        diagnostic: Some(truncate_chars(reason, MAX_DIAGNOSTIC_LEN)),
    }
}
