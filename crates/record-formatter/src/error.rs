//! Error types for formatting strategies.

use thiserror::Error;

/// Failure to turn one record's payload into an argument vector.
///
/// Format errors are record-level: the offending message is skipped and
/// the rest of the batch proceeds.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("record has no payload")]
    EmptyPayload,

    #[error("unknown {kind} strategy '{name}'")]
    UnknownStrategy { kind: &'static str, name: String },

    #[error("formatter '{strategy}' does not support type '{format_type}'")]
    UnsupportedFormatType {
        strategy: String,
        format_type: String,
    },
}

/// Result type alias for formatting operations.
pub type Result<T> = std::result::Result<T, FormatError>;
