use crate::domain::errors::SerializationError;
use crate::ports::outbound::PayloadSerializer;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Payload serializer using `serde_json`.
///
/// Compact output is the default and what sizes are budgeted against.
/// Pretty output exists for debugging dumps; the minifier removes its
/// whitespace again on optimized writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPayloadSerializer {
    pretty: bool,
}

impl JsonPayloadSerializer {
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl PayloadSerializer for JsonPayloadSerializer {
    fn to_text<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, SerializationError> {
        let result = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        result.map_err(|e| SerializationError {
            message: e.to_string(),
        })
    }

    fn from_text<T: DeserializeOwned>(&self, text: &str) -> Result<T, SerializationError> {
        serde_json::from_str(text).map_err(|e| SerializationError {
            message: e.to_string(),
        })
    }
}
