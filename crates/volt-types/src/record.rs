//! Sink records as delivered by the host framework.

use crate::schema::StructValue;
use bytes::Bytes;

/// One message handed over by the host log-consumption framework.
///
/// The `(partition, offset)` pair is unique within a batch and doubles as
/// the identity of the pending write derived from this record.
#[derive(Debug, Clone)]
pub struct SinkRecord {
    /// Partition the message was consumed from
    pub partition: i32,
    /// Offset within the partition
    pub offset: i64,
    /// Message key (if any)
    pub key: Option<Vec<u8>>,
    /// Message value
    pub value: RecordValue,
}

/// Record value variants.
///
/// A record arrives either as raw payload bytes (no value-schema, decoded
/// by a pluggable converter/formatter strategy) or as a schema-typed
/// struct with named, typed fields.
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// Raw payload bytes. The buffer may be a view into the host
    /// framework's receive buffer; its lifetime is not guaranteed beyond
    /// the submission attempt.
    Bytes(Bytes),
    /// Schema-typed structured record
    Struct(StructValue),
}

impl SinkRecord {
    /// Create a record carrying a raw byte payload.
    pub fn from_bytes(partition: i32, offset: i64, payload: impl Into<Bytes>) -> Self {
        Self {
            partition,
            offset,
            key: None,
            value: RecordValue::Bytes(payload.into()),
        }
    }

    /// Create a record carrying a schema-typed struct.
    pub fn from_struct(partition: i32, offset: i64, value: StructValue) -> Self {
        Self {
            partition,
            offset,
            key: None,
            value: RecordValue::Struct(value),
        }
    }

    /// Attach a message key.
    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }
}
