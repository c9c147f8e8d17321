//! # Ports Layer
//!
//! Defines the port traits for the assessment record store.
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving ports (API exposed to callers)
//! - `outbound.rs` - Driven ports (table store and payload serializer)

pub mod inbound;
pub mod outbound;
