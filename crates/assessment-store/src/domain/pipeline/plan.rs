//! # Entity Planning
//!
//! Builds the StorageEntity for each write stage from already-serialized
//! payload text, and decodes entities back into record parts. No I/O.

use super::state::StageOutcome;
use crate::domain::chunking::{
    chunks_needed, is_chunked_key, reassemble_chunks, split_into_chunks,
};
use crate::domain::entity::StorageEntity;
use crate::domain::errors::StoreError;
use crate::domain::estimator::text_size;
use crate::domain::record::{AssessmentRecord, AssessmentStatus, Metrics};

/// Scalar property names.
pub mod fields {
    pub const ID: &str = "id";
    pub const CUSTOMER_ID: &str = "customerId";
    pub const TENANT_ID: &str = "tenantId";
    pub const TIMESTAMP: &str = "timestamp";
    pub const STATUS: &str = "status";
    pub const SCORE: &str = "score";
    pub const DIAGNOSTIC: &str = "diagnostic";
    /// Present and true when the row lost detail at write time.
    pub const SIZE_LIMITED: &str = "sizeLimited";
}

/// Logical properties that may be chunked, each independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkableField {
    Metrics,
    Recommendations,
}

impl ChunkableField {
    pub const ALL: [ChunkableField; 2] = [ChunkableField::Metrics, ChunkableField::Recommendations];

    pub fn name(&self) -> &'static str {
        match self {
            ChunkableField::Metrics => "metrics",
            ChunkableField::Recommendations => "recommendations",
        }
    }
}

/// Serialized text of each chunkable property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub metrics: String,
    pub recommendations: String,
}

impl EncodedPayload {
    pub fn text(&self, field: ChunkableField) -> &str {
        match field {
            ChunkableField::Metrics => &self.metrics,
            ChunkableField::Recommendations => &self.recommendations,
        }
    }

    /// Stage outcome if any property exceeds `max_property_size`.
    pub fn overflow(&self, max_property_size: usize, max_chunks: usize) -> Option<StageOutcome> {
        let sizes = ChunkableField::ALL.map(|f| text_size(self.text(f)));

        if sizes.iter().all(|s| *s <= max_property_size) {
            return None;
        }
        if sizes
            .iter()
            .all(|s| chunks_needed(*s, max_property_size) <= max_chunks)
        {
            Some(StageOutcome::OverFieldBudget)
        } else {
            Some(StageOutcome::OverChunkCeiling)
        }
    }
}

/// An entity ready to hand to the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct WritePlan {
    pub entity: StorageEntity,
    pub status: AssessmentStatus,
    pub chunks_used: usize,
}

impl WritePlan {
    /// Flag the row as written by a lossy stage.
    ///
    /// The status alone cannot carry this for `error` records, which keep
    /// their status.
    pub fn mark_size_limited(&mut self) {
        self.entity.insert(fields::SIZE_LIMITED, true);
    }
}

/// True when `entity` was written by a lossy stage.
pub fn is_size_limited(entity: &StorageEntity) -> bool {
    entity.get_bool(fields::SIZE_LIMITED) == Some(true)
}

/// Entity holding the scalar record properties and any diagnostic.
pub fn header_entity(
    partition_key: &str,
    record: &AssessmentRecord,
    status: AssessmentStatus,
) -> StorageEntity {
    let mut entity = StorageEntity::new(partition_key, record.id.as_str());
    entity.insert(fields::ID, record.id.as_str());
    entity.insert(fields::CUSTOMER_ID, record.customer_id.as_str());
    entity.insert(fields::TENANT_ID, record.tenant_id.as_str());
    // Callers reject timestamps past i64::MAX before planning
    entity.insert(
        fields::TIMESTAMP,
        i64::try_from(record.timestamp).unwrap_or(i64::MAX),
    );
    entity.insert(fields::STATUS, status.as_str());
    entity.insert(fields::SCORE, record.score);
    if let Some(diagnostic) = &record.diagnostic {
        entity.insert(fields::DIAGNOSTIC, diagnostic.as_str());
    }
    entity
}

/// Plan with every payload in a single property.
pub fn plan_unchunked(
    partition_key: &str,
    record: &AssessmentRecord,
    payload: &EncodedPayload,
    status: AssessmentStatus,
    max_property_size: usize,
    max_chunks: usize,
) -> Result<WritePlan, StageOutcome> {
    if let Some(outcome) = payload.overflow(max_property_size, max_chunks) {
        return Err(outcome);
    }

    let mut entity = header_entity(partition_key, record, status);
    for field in ChunkableField::ALL {
        write_single(&mut entity, field.name(), payload.text(field));
    }

    Ok(WritePlan {
        entity,
        status,
        chunks_used: 0,
    })
}

/// Plan that chunks every payload larger than one property.
pub fn plan_chunked(
    partition_key: &str,
    record: &AssessmentRecord,
    payload: &EncodedPayload,
    status: AssessmentStatus,
    max_property_size: usize,
    max_chunks: usize,
) -> Result<WritePlan, StageOutcome> {
    let mut entity = header_entity(partition_key, record, status);
    let mut chunks_used = 0;

    for field in ChunkableField::ALL {
        let text = payload.text(field);
        if text_size(text) <= max_property_size {
            write_single(&mut entity, field.name(), text);
            continue;
        }

        let chunked = split_into_chunks(text, max_property_size);
        if chunked.chunk_count() > max_chunks {
            return Err(StageOutcome::OverChunkCeiling);
        }
        chunked.write_into(&mut entity, field.name());
        chunks_used += chunked.chunk_count();
    }

    Ok(WritePlan {
        entity,
        status,
        chunks_used,
    })
}

/// Plan for a fallback record: scalars and diagnostic, no payloads.
pub fn plan_fallback(partition_key: &str, fallback: &AssessmentRecord) -> WritePlan {
    WritePlan {
        entity: header_entity(partition_key, fallback, fallback.status),
        status: fallback.status,
        chunks_used: 0,
    }
}

fn write_single(entity: &mut StorageEntity, field: &str, text: &str) {
    entity.insert(is_chunked_key(field), false);
    entity.insert(field, text);
}

/// Properties of `previous` that `next` no longer carries.
///
/// These are the orphaned chunk (and payload) properties an update must not
/// leave behind.
pub fn stale_properties(previous: &StorageEntity, next: &StorageEntity) -> Vec<String> {
    previous
        .properties()
        .filter(|(name, _)| !next.contains(name))
        .map(|(name, _)| name.clone())
        .collect()
}

/// Raw text of one chunkable property as read back.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    /// `None` when the property was never written (fallback records).
    pub text: Option<String>,
    pub diagnostic: Option<StoreError>,
}

/// Read `field`, reassembling chunks when the flag is set.
pub fn decode_field(entity: &StorageEntity, field: ChunkableField) -> DecodedField {
    let name = field.name();

    if entity.get_bool(&is_chunked_key(name)) == Some(true) {
        let reassembled = reassemble_chunks(entity, name);
        return DecodedField {
            diagnostic: reassembled.diagnostic(name),
            text: Some(reassembled.value),
        };
    }

    DecodedField {
        text: entity.get_str(name).map(str::to_string),
        diagnostic: None,
    }
}

/// Rebuild the scalar part of a record.
///
/// Payload properties are left empty for the caller to fill. An
/// unrecognised status decodes as `error` with a diagnostic.
pub fn decode_header(entity: &StorageEntity) -> (AssessmentRecord, Option<StoreError>) {
    let text = |name: &str| entity.get_str(name).unwrap_or_default().to_string();

    let raw_status = entity.get_str(fields::STATUS).unwrap_or_default();
    let (status, diagnostic) = match AssessmentStatus::parse(raw_status) {
        Some(status) => (status, None),
        None => (
            AssessmentStatus::Error,
            Some(StoreError::Serialization {
                message: format!("unknown status '{raw_status}'"),
            }),
        ),
    };

    let id = entity
        .get_str(fields::ID)
        .map(str::to_string)
        .unwrap_or_else(|| entity.row_key.clone());

    let record = AssessmentRecord {
        id,
        customer_id: text(fields::CUSTOMER_ID),
        tenant_id: text(fields::TENANT_ID),
        timestamp: entity
            .get_i64(fields::TIMESTAMP)
            .and_then(|t| u64::try_from(t).ok())
            .unwrap_or(0),
        status,
        score: entity.get_f64(fields::SCORE).unwrap_or(0.0),
        metrics: Metrics::default(),
        recommendations: Vec::new(),
        diagnostic: entity.get_str(fields::DIAGNOSTIC).map(str::to_string),
    };

    (record, diagnostic)
}
