//! # Size Estimation
//!
//! Sizes are measured in characters of the serialized form, which is the
//! unit the table store limits properties by.

use crate::domain::errors::StoreError;
use serde::Serialize;

/// Size of already-serialized text, in characters.
pub fn text_size(text: &str) -> usize {
    text.chars().count()
}

/// Size of `value` in canonical (compact) JSON.
///
/// Deterministic and side-effect free. Fails only when the value cannot be
/// serialized at all.
pub fn estimate_json_size<T: Serialize + ?Sized>(value: &T) -> Result<usize, StoreError> {
    serde_json::to_string(value)
        .map(|text| text_size(&text))
        .map_err(|e| StoreError::SizeEstimation {
            reason: e.to_string(),
        })
}
