//! # Domain Layer
//!
//! Pure domain logic for the assessment record store.
//! Nothing in this layer performs I/O.
//!
//! ## Modules
//!
//! - `record` - AssessmentRecord and the typed metrics blocks
//! - `entity` - Flat StorageEntity representation
//! - `config` - StoreConfig, OptimizerConfig and TableLimits
//! - `errors` - Domain error types
//! - `estimator` - Serialized size measurement
//! - `compression` - Lossless JSON minification
//! - `optimizer` - Lossy, priority-based size reduction
//! - `chunking` - Split and reassemble oversized properties
//! - `fallback` - Minimal last-resort record
//! - `pipeline` - Write state machine and entity planning
//! - `metrics` - Write/read counters

pub mod chunking;
pub mod compression;
pub mod config;
pub mod entity;
pub mod errors;
pub mod estimator;
pub mod fallback;
pub mod metrics;
pub mod optimizer;
pub mod pipeline;
pub mod record;
