//! # Assessment Record Store
//!
//! Persists security posture assessment results into a table store whose
//! properties are capped in size (64,000 characters hard, 50,000 budget) and
//! whose entities are capped in property count.
//!
//! ## Write Pipeline
//!
//! ```text
//! AssessmentRecord
//!       │
//!       ▼
//!  [Direct] ──over budget / rejected──→ [Optimized] ──over one property──→ [Chunked]
//!       │                                   │    │                              │
//!       │                 over chunk ceiling│    │rejected                      │rejected
//!       ▼                                   ▼    ▼                              ▼
//!    written                              [Fallback] ←──────────────────────────┘
//!                                               │
//!                                        rejected → [Failed] = StorageCapacityExceeded
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Property Budget | Every written property fits the adapter's size limit |
//! | 2 | Exact Chunking | `chunk0..chunkN-1` concatenated in index order equals the chunked text |
//! | 3 | Truthful Status | Optimized or fallback writes are stored as `completed_with_size_limit` |
//! | 4 | Index Ordering | Chunk order comes from the numeric suffix, never map iteration |
//! | 5 | Aggregates Survive | Optimization never drops score or license totals |
//! | 6 | No Orphans | Updates never leave chunk properties from a previous, larger write |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure logic: records, optimizer, chunking, write state machine
//! - `ports/` - Port traits (inbound API, outbound table store and serializer)
//! - `adapters/` - In-memory and file-backed table stores, JSON serializer
//! - `service/` - Application service driving the pipeline against an adapter
//!
//! ## Usage
//!
//! ```ignore
//! use assessment_store::{AssessmentStoreApi, AssessmentStoreService, StoreConfig};
//!
//! let service = AssessmentStoreService::new_in_memory(StoreConfig::default());
//!
//! let result = service.write_record(&record)?;
//! let stored = service.read_record(&record.id)?;
//! if stored.metrics.partial {
//!     // show the data as incomplete
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export key types for convenience
pub use adapters::{FileBackedTableStore, InMemoryTableStore, JsonPayloadSerializer};
pub use domain::chunking::{reassemble_chunks, split_into_chunks, ChunkedField, Reassembled};
pub use domain::compression::{JsonMinifier, NoOpCompressor, PayloadCompressor};
pub use domain::config::{OptimizerConfig, StoreConfig, TableLimits};
pub use domain::entity::{EntityValue, StorageEntity};
pub use domain::errors::{AdapterError, SerializationError, StoreError};
pub use domain::fallback::build_fallback_record;
pub use domain::metrics::StoreMetricsCollector;
pub use domain::optimizer::Optimizer;
pub use domain::pipeline::{next_stage, ChunkableField, StageOutcome, WriteStage};
pub use domain::record::{
    AssessmentRecord, AssessmentStatus, ControlScore, LicenseDetail, LicenseMetrics, Metrics,
    Recommendation, SecureScoreMetrics, Timestamp,
};
pub use ports::inbound::{AssessmentStoreApi, ReadOutcome, WriteResult};
pub use ports::outbound::{PayloadSerializer, StorageAdapter, WriteMode};
pub use service::{AssessmentStoreDependencies, AssessmentStoreService};
