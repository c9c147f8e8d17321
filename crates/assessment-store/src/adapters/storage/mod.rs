//! Storage Adapters
//!
//! Implementations of the `StorageAdapter` trait.

mod file;
mod memory;

pub use file::FileBackedTableStore;
pub use memory::InMemoryTableStore;

use crate::domain::config::TableLimits;
use crate::domain::entity::StorageEntity;
use crate::domain::errors::AdapterError;

/// Reject `entity` if it breaks `limits`, reporting the largest offender.
pub(crate) fn check_limits(entity: &StorageEntity, limits: &TableLimits) -> Result<(), AdapterError> {
    let count = entity.property_count();
    if count > limits.max_properties {
        return Err(AdapterError::TooManyProperties {
            count,
            max: limits.max_properties,
        });
    }

    match entity.largest_property() {
        Some((field, size)) if size > limits.max_property_size => {
            Err(AdapterError::PropertyTooLarge {
                field: field.to_string(),
                size,
                max: limits.max_property_size,
            })
        }
        _ => Ok(()),
    }
}
