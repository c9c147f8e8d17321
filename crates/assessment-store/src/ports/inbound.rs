//! # Inbound Ports (Driving Ports)
//!
//! The primary API of the assessment record store.

use crate::domain::errors::StoreError;
use crate::domain::pipeline::WriteStage;
use crate::domain::record::{AssessmentRecord, AssessmentStatus};

/// Outcome of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// Status actually persisted. Differs from the input when detail was lost.
    pub status: AssessmentStatus,
    /// Chunk properties written across all chunked fields.
    pub chunks_used: usize,
    /// Stage that produced the stored entity.
    pub stage: WriteStage,
    /// Properties of the previous entity that the update removed.
    pub stale_properties_cleared: usize,
}

/// A record together with everything that went wrong decoding it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOutcome {
    pub record: AssessmentRecord,
    /// Non-fatal problems, e.g. `IncompleteChunkSet`. Empty on a clean read.
    pub diagnostics: Vec<StoreError>,
}

impl ReadOutcome {
    pub fn is_partial(&self) -> bool {
        self.record.metrics.partial
    }
}

/// Primary API of the assessment record store.
///
/// Implementations must keep every written property within the adapter's
/// size limit and report any lost detail through the stored status.
pub trait AssessmentStoreApi {
    /// Persist `record`, degrading as far as needed to fit the store.
    ///
    /// ## Errors
    ///
    /// - `SizeEstimation`: the record contains a non-finite number
    /// - `StorageCapacityExceeded`: even the fallback record was rejected
    /// - `Storage`: adapter failure unrelated to capacity
    fn write_record(&self, record: &AssessmentRecord) -> Result<WriteResult, StoreError>;

    /// Read a record, reassembling chunked properties.
    ///
    /// Missing chunks and unparseable payloads do not fail the read; the
    /// record comes back with `metrics.partial = true`.
    ///
    /// ## Errors
    ///
    /// - `RecordNotFound`: no record stored under `id`
    /// - `Storage`: adapter failure
    fn read_record(&self, id: &str) -> Result<AssessmentRecord, StoreError> {
        self.read_record_detailed(id).map(|outcome| outcome.record)
    }

    /// Like [`read_record`](Self::read_record), also returning diagnostics.
    fn read_record_detailed(&self, id: &str) -> Result<ReadOutcome, StoreError>;

    /// Remove a record. Returns false when nothing was stored under `id`.
    fn delete_record(&self, id: &str) -> Result<bool, StoreError>;

    /// All records of a customer, newest first.
    fn list_customer_records(&self, customer_id: &str)
        -> Result<Vec<AssessmentRecord>, StoreError>;
}
