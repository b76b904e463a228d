//! JSON-based payload converter.

use crate::error::{FormatError, Result};
use crate::Converter;
use base64::Engine;
use tracing::debug;
use volt_types::{FieldValue, RecordValue, SinkRecord, StructValue};

/// Default converter normalizing record values to text payload bytes.
///
/// Raw payloads are parsed as JSON. A JSON string unwraps to its contents
/// so that delimited payloads survive the round trip; any other JSON value
/// is re-serialized compactly. Payloads that are not valid JSON are taken
/// as bare text, matching the upstream transformer's quoting of unquoted
/// input. Schema-typed values serialize to a JSON object keyed by field
/// name.
#[derive(Debug, Default)]
pub struct JsonConverter;

impl JsonConverter {
    pub fn new() -> Self {
        Self
    }
}

impl Converter for JsonConverter {
    fn convert(&self, record: &SinkRecord) -> Result<Vec<u8>> {
        match &record.value {
            RecordValue::Bytes(payload) => {
                if payload.is_empty() {
                    return Err(FormatError::EmptyPayload);
                }
                let text =
                    std::str::from_utf8(payload).map_err(|_| FormatError::InvalidUtf8)?;
                match serde_json::from_str::<serde_json::Value>(text) {
                    Ok(serde_json::Value::String(s)) => Ok(s.into_bytes()),
                    Ok(value) => Ok(value.to_string().into_bytes()),
                    Err(_) => {
                        // Bare text is accepted as a JSON string.
                        debug!("payload is not JSON, passing through as text");
                        Ok(text.as_bytes().to_vec())
                    }
                }
            }
            RecordValue::Struct(value) => {
                let object = struct_to_json(value);
                Ok(object.to_string().into_bytes())
            }
        }
    }
}

fn struct_to_json(value: &StructValue) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (field, raw) in value.schema.fields.iter().zip(&value.values) {
        map.insert(field.name.clone(), field_to_json(raw));
    }
    serde_json::Value::Object(map)
}

fn field_to_json(value: &FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Null => serde_json::Value::Null,
        FieldValue::Int8(v) => serde_json::json!(*v),
        FieldValue::Int16(v) => serde_json::json!(*v),
        FieldValue::Int32(v) => serde_json::json!(*v),
        FieldValue::Int64(v) => serde_json::json!(*v),
        FieldValue::Float32(v) => serde_json::json!(*v),
        FieldValue::Float64(v) => serde_json::json!(*v),
        FieldValue::Bool(v) => serde_json::json!(*v),
        FieldValue::String(s) => serde_json::json!(s),
        FieldValue::Bytes(b) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(b);
            serde_json::json!(encoded)
        }
    }
}
