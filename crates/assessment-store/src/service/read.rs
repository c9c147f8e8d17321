//! # Read Orchestration
//!
//! Decodes a stored entity back into a record. Never fails once the entity
//! is in hand: anything missing or unparseable becomes a diagnostic and the
//! record is flagged partial.

use super::*;
use crate::domain::entity::StorageEntity;
use crate::domain::pipeline::{decode_field, decode_header, is_size_limited, ChunkableField};
use crate::domain::record::{Metrics, Recommendation};
use serde::de::DeserializeOwned;

impl<SA, PS> AssessmentStoreService<SA, PS>
where
    SA: StorageAdapter,
    PS: PayloadSerializer,
{
    pub(crate) fn decode_entity(&self, entity: &StorageEntity) -> ReadOutcome {
        let (mut record, header_diagnostic) = decode_header(entity);
        let mut diagnostics: Vec<StoreError> = header_diagnostic.into_iter().collect();

        let mut metrics: Metrics =
            self.decode_payload(entity, ChunkableField::Metrics, &mut diagnostics);
        let recommendations: Vec<Recommendation> =
            self.decode_payload(entity, ChunkableField::Recommendations, &mut diagnostics);
        record.recommendations = recommendations;

        let partial = record.status.is_degraded()
            || is_size_limited(entity)
            || !diagnostics.is_empty();
        metrics.partial |= partial;
        record.metrics = metrics;

        self.metrics.record_read(record.metrics.partial);
        if !diagnostics.is_empty() {
            tracing::warn!(
                "[store] ⚠ Record {} read with {} problem(s): {}",
                record.id,
                diagnostics.len(),
                diagnostics[0]
            );
        }

        ReadOutcome {
            record,
            diagnostics,
        }
    }

    /// Parse one chunkable property, defaulting when it is absent or broken.
    fn decode_payload<T: DeserializeOwned + Default>(
        &self,
        entity: &StorageEntity,
        field: ChunkableField,
        diagnostics: &mut Vec<StoreError>,
    ) -> T {
        let decoded = decode_field(entity, field);
        diagnostics.extend(decoded.diagnostic);

        let Some(text) = decoded.text else {
            return T::default();
        };

        match self.serializer.from_text(&text) {
            Ok(value) => value,
            Err(e) => {
                diagnostics.push(StoreError::Serialization {
                    message: format!("{}: {}", field.name(), e.message),
                });
                T::default()
            }
        }
    }
}
