use super::check_limits;
use crate::domain::config::TableLimits;
use crate::domain::entity::StorageEntity;
use crate::domain::errors::AdapterError;
use crate::ports::outbound::{StorageAdapter, WriteMode};
use parking_lot::RwLock;
use std::collections::HashMap;

type RowKey = (String, String);

/// In-memory table store for tests and embedding.
///
/// Enforces the same per-property and per-entity limits as the production
/// table store, so capacity behaviour can be exercised without a network.
#[derive(Default)]
pub struct InMemoryTableStore {
    rows: RwLock<HashMap<RowKey, StorageEntity>>,
    limits: TableLimits,
}

impl InMemoryTableStore {
    pub fn new(limits: TableLimits) -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            limits,
        }
    }

    pub fn limits(&self) -> TableLimits {
        self.limits
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Overwrite a row without limit checks.
    ///
    /// Lets tests simulate lost or corrupted properties.
    pub fn put_unchecked(&self, entity: StorageEntity) {
        let key = (entity.partition_key.clone(), entity.row_key.clone());
        self.rows.write().insert(key, entity);
    }
}

impl StorageAdapter for InMemoryTableStore {
    fn get(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<StorageEntity>, AdapterError> {
        let key = (partition_key.to_string(), row_key.to_string());
        Ok(self.rows.read().get(&key).cloned())
    }

    fn put(&self, entity: StorageEntity, mode: WriteMode) -> Result<(), AdapterError> {
        check_limits(&entity, &self.limits)?;

        let key = (entity.partition_key.clone(), entity.row_key.clone());
        let mut rows = self.rows.write();
        if mode == WriteMode::Insert && rows.contains_key(&key) {
            return Err(AdapterError::EntityExists {
                partition_key: key.0,
                row_key: key.1,
            });
        }
        rows.insert(key, entity);
        Ok(())
    }

    fn delete(&self, partition_key: &str, row_key: &str) -> Result<bool, AdapterError> {
        let key = (partition_key.to_string(), row_key.to_string());
        Ok(self.rows.write().remove(&key).is_some())
    }

    fn list_partition(&self, partition_key: &str) -> Result<Vec<StorageEntity>, AdapterError> {
        Ok(self
            .rows
            .read()
            .values()
            .filter(|e| e.partition_key == partition_key)
            .cloned()
            .collect())
    }
}
