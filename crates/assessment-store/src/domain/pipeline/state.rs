//! # Write State Machine
//!
//! State Machine:
//! ```text
//! [Direct] ──OverFieldBudget | Rejected──→ [Optimized]
//!                                              │
//!                                              ├── OverFieldBudget ──→ [Chunked]
//!                                              │                          │
//!                                              └── OverChunkCeiling ──┐   │ any failure
//!                                                  | Rejected         ↓   ↓
//!                                                                  [Fallback]
//!                                                                      │ any failure
//!                                                                      ↓
//!                                                                  [Failed]
//! ```
//!
//! Transitions are a pure function of (stage, outcome), so every path can be
//! tested without a store.

use crate::domain::record::AssessmentStatus;
use std::fmt;

/// Stage of the write pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteStage {
    /// Unmodified record, one property per payload.
    Direct,
    /// Optimized and minified, one property per payload.
    Optimized,
    /// Optimized and minified, oversized payloads split into chunks.
    Chunked,
    /// Minimal record with identifiers and aggregate score only.
    Fallback,
    /// Terminal: nothing could be written.
    Failed,
}

impl WriteStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteStage::Direct => "direct",
            WriteStage::Optimized => "optimized",
            WriteStage::Chunked => "chunked",
            WriteStage::Fallback => "fallback",
            WriteStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WriteStage::Failed)
    }

    /// True for stages that drop detail from the record.
    pub fn is_lossy(&self) -> bool {
        !matches!(self, WriteStage::Direct)
    }
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a stage could not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// A payload is larger than one property but fits the chunk ceiling.
    OverFieldBudget,
    /// A payload needs more chunks than the ceiling allows.
    OverChunkCeiling,
    /// The adapter refused the write on capacity grounds.
    Rejected,
}

/// Next stage after `stage` failed with `outcome`.
pub fn next_stage(stage: WriteStage, outcome: StageOutcome) -> WriteStage {
    match (stage, outcome) {
        (WriteStage::Direct, _) => WriteStage::Optimized,

        (WriteStage::Optimized, StageOutcome::OverFieldBudget) => WriteStage::Chunked,
        (WriteStage::Optimized, StageOutcome::OverChunkCeiling | StageOutcome::Rejected) => {
            WriteStage::Fallback
        }

        (WriteStage::Chunked, _) => WriteStage::Fallback,

        (WriteStage::Fallback, _) | (WriteStage::Failed, _) => WriteStage::Failed,
    }
}

/// Status persisted for a record written at `stage`.
///
/// Lossy stages downgrade `completed` so readers can detect the loss;
/// `error` is never upgraded.
pub fn stored_status(original: AssessmentStatus, stage: WriteStage) -> AssessmentStatus {
    match (original, stage.is_lossy()) {
        (AssessmentStatus::Error, _) => AssessmentStatus::Error,
        (status, false) => status,
        (_, true) => AssessmentStatus::CompletedWithSizeLimit,
    }
}
