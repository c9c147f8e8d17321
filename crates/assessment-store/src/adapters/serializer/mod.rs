//! Serializer Adapters
//!
//! Implementations of the `PayloadSerializer` trait.

mod json;

pub use self::json::JsonPayloadSerializer;
