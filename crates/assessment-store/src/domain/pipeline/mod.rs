//! # Write/Read Pipeline
//!
//! The pure half of the orchestrator: stage transitions and entity
//! planning. Adapter I/O lives in `service`.

mod plan;
mod state;

#[cfg(test)]
mod tests;

pub use plan::{
    decode_field, decode_header, fields, header_entity, is_size_limited, plan_chunked, plan_fallback,
    plan_unchunked, stale_properties, ChunkableField, DecodedField, EncodedPayload, WritePlan,
};
pub use state::{next_stage, stored_status, StageOutcome, WriteStage};
