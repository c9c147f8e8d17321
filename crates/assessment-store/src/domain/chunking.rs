//! # Property Chunking
//!
//! Splits a string that exceeds the per-property budget into ordered
//! fragments and reassembles them on read.
//!
//! ## Physical Layout
//!
//! A logical property `metrics` becomes:
//!
//! ```text
//! metrics_isChunked  = true
//! metrics_chunkCount = 3
//! metrics_chunk0     = text[0      .. C]
//! metrics_chunk1     = text[C      .. 2C]
//! metrics_chunk2     = text[2C     .. len]
//! ```
//!
//! Offsets are in characters. Order is taken from the numeric suffix,
//! never from property iteration order.

use crate::domain::entity::StorageEntity;
use crate::domain::errors::StoreError;

/// Name of the flag property for `field`.
pub fn is_chunked_key(field: &str) -> String {
    format!("{field}_isChunked")
}

/// Name of the chunk-count property for `field`.
pub fn chunk_count_key(field: &str) -> String {
    format!("{field}_chunkCount")
}

/// Name of chunk `index` of `field`.
pub fn chunk_key(field: &str, index: usize) -> String {
    format!("{field}_chunk{index}")
}

/// Number of chunks needed for `len` characters at `max_chunk_chars` each.
pub fn chunks_needed(len: usize, max_chunk_chars: usize) -> usize {
    len.div_ceil(max_chunk_chars.max(1))
}

/// Ordered fragments of one logical property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedField {
    pub is_chunked: bool,
    pub chunks: Vec<String>,
}

impl ChunkedField {
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Concatenate the fragments in index order.
    pub fn join(&self) -> String {
        self.chunks.concat()
    }

    /// Write flag, count and chunk properties for `field` into `entity`.
    pub fn write_into(&self, entity: &mut StorageEntity, field: &str) {
        entity.insert(is_chunked_key(field), true);
        entity.insert(chunk_count_key(field), self.chunk_count() as i64);
        for (index, chunk) in self.chunks.iter().enumerate() {
            entity.insert(chunk_key(field, index), chunk.as_str());
        }
    }
}

/// Split `text` so that `chunks[i] == text[i*C .. (i+1)*C]` in characters.
///
/// A chunk size of 0 is treated as 1. Empty input yields no chunks.
pub fn split_into_chunks(text: &str, max_chunk_chars: usize) -> ChunkedField {
    let size = max_chunk_chars.max(1);
    let mut chunks = Vec::with_capacity(chunks_needed(text.len(), size));
    let mut start = 0;
    let mut taken = 0;

    for (offset, _) in text.char_indices() {
        if taken == size {
            chunks.push(text[start..offset].to_string());
            start = offset;
            taken = 0;
        }
        taken += 1;
    }
    if start < text.len() {
        chunks.push(text[start..].to_string());
    }

    ChunkedField {
        is_chunked: true,
        chunks,
    }
}

/// Result of reassembling a chunked property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassembled {
    /// Concatenation of the chunks present, missing ones treated as empty.
    pub value: String,
    /// Chunk count recorded on the entity.
    pub expected: usize,
    /// Indices of chunk properties that were absent.
    ///
    /// When the recorded count runs past the highest chunk present, only the
    /// first index of that absent tail is listed.
    pub missing: Vec<usize>,
}

impl Reassembled {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// `IncompleteChunkSet` diagnostic when chunks were missing.
    pub fn diagnostic(&self, field: &str) -> Option<StoreError> {
        if self.is_complete() {
            return None;
        }
        Some(StoreError::IncompleteChunkSet {
            field: field.to_string(),
            missing: self.missing.clone(),
            expected: self.expected,
        })
    }
}

/// Indices of the `field_chunk{i}` properties present on `entity`.
fn present_chunk_indices(entity: &StorageEntity, field: &str) -> Vec<usize> {
    let prefix = format!("{field}_chunk");
    entity
        .properties()
        .filter_map(|(name, _)| name.strip_prefix(prefix.as_str()))
        .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|suffix| suffix.parse().ok())
        .collect()
}

/// Concatenate `field_chunk0 .. field_chunk{N-1}` where N is `field_chunkCount`.
///
/// Never fails: a read racing a write, or a lost property, yields a
/// best-effort value plus the list of missing indices. Work is bounded by
/// the chunk properties actually present, whatever count is recorded.
pub fn reassemble_chunks(entity: &StorageEntity, field: &str) -> Reassembled {
    let expected = entity
        .get_i64(&chunk_count_key(field))
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);

    let present_end = present_chunk_indices(entity, field)
        .into_iter()
        .max()
        .map_or(0, |max| max + 1);
    let bounded = expected.min(present_end);

    let mut value = String::new();
    let mut missing = Vec::new();

    for index in 0..bounded {
        match entity.get_str(&chunk_key(field, index)) {
            Some(chunk) => value.push_str(chunk),
            None => missing.push(index),
        }
    }
    if expected > bounded {
        missing.push(bounded);
    }

    Reassembled {
        value,
        expected,
        missing,
    }
}
