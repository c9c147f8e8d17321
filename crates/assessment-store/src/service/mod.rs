//! # Assessment Store Service
//!
//! The application service implementing `AssessmentStoreApi`.
//!
//! ## Architecture
//!
//! This service:
//! 1. Drives the write state machine against the injected table store
//! 2. Reassembles chunked properties and flags partial data on read
//! 3. Counts writes per stage and partial reads
//!
//! All pipeline decisions live in `domain::pipeline`; this layer only does
//! adapter I/O, serialization and logging.

mod read;
mod write;

use crate::adapters::{InMemoryTableStore, JsonPayloadSerializer};
use crate::domain::compression::{JsonMinifier, NoOpCompressor, PayloadCompressor};
use crate::domain::config::{StoreConfig, TableLimits};
use crate::domain::errors::StoreError;
use crate::domain::metrics::StoreMetricsCollector;
use crate::domain::optimizer::Optimizer;
use crate::domain::pipeline::fields;
use crate::domain::record::AssessmentRecord;
use crate::ports::inbound::{AssessmentStoreApi, ReadOutcome, WriteResult};
use crate::ports::outbound::{PayloadSerializer, StorageAdapter};

/// The assessment record store.
pub struct AssessmentStoreService<SA, PS>
where
    SA: StorageAdapter,
    PS: PayloadSerializer,
{
    /// Table store rows are written to.
    pub(crate) adapter: SA,
    /// Encoding of the nested payloads.
    pub(crate) serializer: PS,
    /// Lossless minifier applied from the optimized stage on.
    pub(crate) compressor: Box<dyn PayloadCompressor>,
    pub(crate) optimizer: Optimizer,
    pub(crate) config: StoreConfig,
    pub(crate) metrics: StoreMetricsCollector,
}

/// Dependencies for AssessmentStoreService
pub struct AssessmentStoreDependencies<SA, PS> {
    pub adapter: SA,
    pub serializer: PS,
}

impl<SA, PS> AssessmentStoreService<SA, PS>
where
    SA: StorageAdapter,
    PS: PayloadSerializer,
{
    pub fn new(deps: AssessmentStoreDependencies<SA, PS>, config: StoreConfig) -> Self {
        let compressor: Box<dyn PayloadCompressor> = if config.compress_payloads {
            Box::new(JsonMinifier)
        } else {
            Box::new(NoOpCompressor)
        };

        tracing::debug!(
            "[store] Service configured: budget={} chunks={} partition={}",
            config.max_property_size,
            config.max_chunks,
            config.partition_key
        );

        Self {
            adapter: deps.adapter,
            serializer: deps.serializer,
            compressor,
            optimizer: Optimizer::new(config.optimizer.clone()),
            config,
            metrics: StoreMetricsCollector::new(),
        }
    }

    pub fn adapter(&self) -> &SA {
        &self.adapter
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn metrics(&self) -> &StoreMetricsCollector {
        &self.metrics
    }
}

impl AssessmentStoreService<InMemoryTableStore, JsonPayloadSerializer> {
    /// Service over a fresh in-memory store with default table limits.
    pub fn new_in_memory(config: StoreConfig) -> Self {
        Self::new(
            AssessmentStoreDependencies {
                adapter: InMemoryTableStore::new(TableLimits::default()),
                serializer: JsonPayloadSerializer::compact(),
            },
            config,
        )
    }
}

impl<SA, PS> AssessmentStoreApi for AssessmentStoreService<SA, PS>
where
    SA: StorageAdapter,
    PS: PayloadSerializer,
{
    fn write_record(&self, record: &AssessmentRecord) -> Result<WriteResult, StoreError> {
        self.run_write(record)
    }

    fn read_record_detailed(&self, id: &str) -> Result<ReadOutcome, StoreError> {
        let entity = self
            .adapter
            .get(&self.config.partition_key, id)?
            .ok_or_else(|| StoreError::RecordNotFound { id: id.to_string() })?;

        Ok(self.decode_entity(&entity))
    }

    fn delete_record(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.adapter.delete(&self.config.partition_key, id)?;
        if removed {
            tracing::info!("[store] 🗑 Deleted record {}", id);
        }
        Ok(removed)
    }

    fn list_customer_records(
        &self,
        customer_id: &str,
    ) -> Result<Vec<AssessmentRecord>, StoreError> {
        let mut records: Vec<AssessmentRecord> = self
            .adapter
            .list_partition(&self.config.partition_key)?
            .iter()
            .filter(|entity| entity.get_str(fields::CUSTOMER_ID) == Some(customer_id))
            .map(|entity| self.decode_entity(entity).record)
            .collect();

        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }
}
