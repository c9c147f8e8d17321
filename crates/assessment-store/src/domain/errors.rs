//! # Domain Errors
//!
//! Error types for the assessment record store.
//!
//! ## Severity
//!
//! | Error | Recoverable | Effect |
//! |-------|-------------|--------|
//! | `SizeEstimation` | no | Malformed input, surfaced immediately |
//! | `StorageRejected` | yes | Drives the next degrade stage |
//! | `IncompleteChunkSet` | yes | Read returns partial data plus this diagnostic |
//! | `StorageCapacityExceeded` | no | Even the fallback write failed |

use crate::domain::pipeline::WriteStage;
use thiserror::Error;

/// Errors surfaced by the record store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Input could not be measured in the target serialization.
    #[error("Size estimation failed: {reason}")]
    SizeEstimation { reason: String },

    /// The adapter refused a write on size or property-count grounds.
    #[error("Storage rejected {stage} write: {source}")]
    StorageRejected {
        stage: WriteStage,
        #[source]
        source: AdapterError,
    },

    /// One or more chunk properties were missing on read.
    #[error("Incomplete chunk set for {field}: missing {missing:?} of {expected} chunks")]
    IncompleteChunkSet {
        field: String,
        missing: Vec<usize>,
        expected: usize,
    },

    /// Even the fallback record could not be written.
    #[error("Storage capacity exceeded for record {record_id}: {reason}")]
    StorageCapacityExceeded { record_id: String, reason: String },

    /// No record is stored under this id.
    #[error("Assessment record not found: {id}")]
    RecordNotFound { id: String },

    /// Stored payload could not be decoded.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Adapter failure unrelated to capacity (I/O, conflicts).
    #[error("Storage error: {source}")]
    Storage {
        #[from]
        source: AdapterError,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Typed table-store errors.
///
/// Capacity violations are distinguished structurally so the write pipeline
/// never has to inspect error messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// A single property exceeds the per-property size limit.
    #[error("Property {field} is {size} characters, limit is {max}")]
    PropertyTooLarge {
        field: String,
        size: usize,
        max: usize,
    },

    /// The entity carries more properties than the store allows.
    #[error("Entity has {count} properties, limit is {max}")]
    TooManyProperties { count: usize, max: usize },

    /// Insert mode was used for an entity that already exists.
    #[error("Entity already exists: {partition_key}/{row_key}")]
    EntityExists {
        partition_key: String,
        row_key: String,
    },

    /// Backing store I/O failure.
    #[error("Table store I/O error: {message}")]
    Io { message: String },
}

impl AdapterError {
    /// True when the rejection was caused by size or property-count limits.
    pub fn is_capacity_violation(&self) -> bool {
        matches!(
            self,
            AdapterError::PropertyTooLarge { .. } | AdapterError::TooManyProperties { .. }
        )
    }
}

/// Serializer failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Serialization error: {message}")]
pub struct SerializationError {
    pub message: String,
}

impl From<SerializationError> for StoreError {
    fn from(err: SerializationError) -> Self {
        StoreError::Serialization {
            message: err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_violation_is_structural() {
        let too_large = AdapterError::PropertyTooLarge {
            field: "metrics".to_string(),
            size: 70_000,
            max: 64_000,
        };
        let too_many = AdapterError::TooManyProperties {
            count: 300,
            max: 252,
        };
        let io = AdapterError::Io {
            message: "property too large".to_string(),
        };

        assert!(too_large.is_capacity_violation());
        assert!(too_many.is_capacity_violation());
        // Message content is irrelevant
        assert!(!io.is_capacity_violation());
    }

    #[test]
    fn test_adapter_error_conversion() {
        let err: StoreError = AdapterError::Io {
            message: "disk failure".to_string(),
        }
        .into();

        match err {
            StoreError::Storage { source } => {
                assert!(source.to_string().contains("disk failure"));
            }
            _ => panic!("Expected Storage"),
        }
    }

    #[test]
    fn test_rejection_display_names_stage() {
        let err = StoreError::StorageRejected {
            stage: WriteStage::Chunked,
            source: AdapterError::TooManyProperties {
                count: 260,
                max: 252,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("chunked"));
        assert!(msg.contains("260"));
    }
}
