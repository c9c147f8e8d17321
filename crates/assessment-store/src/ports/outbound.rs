//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the assessment store service.

use crate::domain::entity::StorageEntity;
use crate::domain::errors::{AdapterError, SerializationError, StoreError};
use crate::domain::estimator::text_size;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// How `put` treats an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fail with `EntityExists` if the row is present.
    Insert,
    /// Replace the whole row. Properties absent from the new entity are gone.
    Replace,
}

/// Abstract interface to a table store with per-property size limits.
///
/// Implementations enforce their limits on `put` and report violations as
/// `PropertyTooLarge` or `TooManyProperties`, never as `Io`.
///
/// Production: a cloud table client in the host application
/// Testing: `InMemoryTableStore`
pub trait StorageAdapter: Send + Sync {
    /// Fetch a row.
    fn get(&self, partition_key: &str, row_key: &str)
        -> Result<Option<StorageEntity>, AdapterError>;

    /// Write a row. A failed put leaves the previous row untouched.
    fn put(&self, entity: StorageEntity, mode: WriteMode) -> Result<(), AdapterError>;

    /// Delete a row. Returns false when the row did not exist.
    fn delete(&self, partition_key: &str, row_key: &str) -> Result<bool, AdapterError>;

    /// Every row in a partition, in no particular order.
    fn list_partition(&self, partition_key: &str) -> Result<Vec<StorageEntity>, AdapterError>;
}

/// Text serialization of the nested payloads.
///
/// Sizes are measured in the same serialization that is stored.
pub trait PayloadSerializer: Send + Sync {
    fn to_text<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, SerializationError>;

    fn from_text<T: DeserializeOwned>(&self, text: &str) -> Result<T, SerializationError>;

    /// Serialized size in characters.
    fn estimate_size<T: Serialize + ?Sized>(&self, value: &T) -> Result<usize, StoreError> {
        self.to_text(value)
            .map(|text| text_size(&text))
            .map_err(|e| StoreError::SizeEstimation { reason: e.message })
    }
}
