//! # Adapters Module
//!
//! Implementations of the outbound ports.
//!
//! ## Modules
//!
//! - `storage`: table stores enforcing per-property and per-entity limits
//! - `serializer`: JSON payload serializer

pub mod serializer;
pub mod storage;

pub use serializer::JsonPayloadSerializer;
pub use storage::{FileBackedTableStore, InMemoryTableStore};
