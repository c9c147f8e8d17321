//! # Payload Compression
//!
//! Lossless, format-preserving minification of serialized JSON.
//!
//! The output is still plain JSON and is parsed directly on read, so there is
//! no paired decompress step.

// =============================================================================
// COMPRESSOR TRAIT
// =============================================================================

/// Trait for payload compression implementations
pub trait PayloadCompressor: Send + Sync {
    /// Produce a semantically identical, no longer text
    fn compress(&self, text: &str) -> String;

    /// Check if compression is enabled
    fn is_enabled(&self) -> bool;
}

// =============================================================================
// JSON MINIFIER
// =============================================================================

/// Strips insignificant whitespace outside JSON string literals.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonMinifier;

impl PayloadCompressor for JsonMinifier {
    fn compress(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut in_string = false;
        let mut escaped = false;

        for ch in text.chars() {
            if in_string {
                out.push(ch);
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    in_string = false;
                }
                continue;
            }

            match ch {
                '"' => {
                    in_string = true;
                    out.push(ch);
                }
                ' ' | '\n' | '\r' | '\t' => {}
                _ => out.push(ch),
            }
        }

        out
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

// =============================================================================
// NO-OP COMPRESSOR
// =============================================================================

/// No-op compressor that returns text unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCompressor;

impl PayloadCompressor for NoOpCompressor {
    fn compress(&self, text: &str) -> String {
        text.to_string()
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
