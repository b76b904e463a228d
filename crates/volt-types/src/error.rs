//! Error types for record marshaling.

use thiserror::Error;

/// Record-level marshaling failure.
///
/// These errors fail a single record; the caller skips the offending
/// message and continues with the rest of the batch.
#[derive(Error, Debug)]
pub enum MarshalError {
    #[error("unsupported field kind '{kind}' for field '{field}'")]
    UnsupportedKind { field: String, kind: &'static str },

    #[error("field '{field}' declared as {expected} but value is {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("record has {values} value(s) for {fields} schema field(s)")]
    ValueCountMismatch { values: usize, fields: usize },

    #[error("invalid decimal in field '{field}': {message}")]
    InvalidDecimal { field: String, message: String },

    #[error("timestamp out of range in field '{field}': {value}")]
    TimestampOutOfRange { field: String, value: i64 },
}

/// Result type alias for marshaling operations.
pub type Result<T> = std::result::Result<T, MarshalError>;
