//! Field schemas, logical types, and struct values.
//!
//! A schema-typed record carries a [`RecordSchema`] describing its fields
//! in declared order. Each field has a primitive kind and optionally a
//! logical type layered on top of it; the logical type names the semantic
//! interpretation (decimal, date, time, timestamp) and dictates which
//! underlying primitive representation is expected.

use bytes::Bytes;

/// Primitive kind of a field as declared by the value schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Declared by some schemas but not representable as a procedure
    /// argument in the target dialect; marshaling a record containing a
    /// boolean field fails the whole record.
    Boolean,
    String,
    Bytes,
}

impl FieldKind {
    /// Schema name of the kind, used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }
}

/// Semantic interpretation layered over a primitive kind.
///
/// Logical values arrive in the schema's native representation and are
/// resolved to the procedure-call wire representation during marshaling:
///
/// - `Decimal` - big-endian two's-complement unscaled bytes plus a scale
/// - `Date` - days since the Unix epoch as an `int32`
/// - `Time` - milliseconds since midnight as an `int32`
/// - `Timestamp` - milliseconds since the Unix epoch as an `int64`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    Decimal {
        /// Number of digits after the decimal point
        scale: u32,
    },
    Date,
    Time,
    Timestamp,
}

impl LogicalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decimal { .. } => "decimal",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
        }
    }
}

/// Declaration of one named, typed field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// Field name
    pub name: String,
    /// Declared primitive kind
    pub kind: FieldKind,
    /// Optional logical type carried by the field schema
    pub logical: Option<LogicalType>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            logical: None,
        }
    }

    pub fn with_logical(mut self, logical: LogicalType) -> Self {
        self.logical = Some(logical);
        self
    }
}

/// Ordered field declarations of a schema-typed record value.
#[derive(Debug, Clone, Default)]
pub struct RecordSchema {
    pub fields: Vec<FieldSchema>,
}

impl RecordSchema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }
}

/// Raw value of one field before projection.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    String(String),
    /// Possibly a zero-copy view into the host framework's buffer
    Bytes(Bytes),
}

impl FieldValue {
    /// Type name of the value, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int8(_) => "int8",
            Self::Int16(_) => "int16",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::Bool(_) => "boolean",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
        }
    }
}

/// A schema-typed record value: the schema plus one raw value per field,
/// aligned by position with the schema's declared order.
#[derive(Debug, Clone)]
pub struct StructValue {
    pub schema: RecordSchema,
    pub values: Vec<FieldValue>,
}

impl StructValue {
    pub fn new(schema: RecordSchema, values: Vec<FieldValue>) -> Self {
        Self { schema, values }
    }
}
