//! Procedure-argument values.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// One positional argument of a procedure invocation.
///
/// The variants mirror the primitive kinds the target database accepts for
/// procedure parameters. An argument vector is an ordered `Vec<SqlValue>`
/// positionally aligned to the procedure's declared parameter list; it has
/// no persisted identity and lives only for a single submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL, passed through without coercion
    Null,

    /// 8-bit signed integer
    TinyInt(i8),

    /// 16-bit signed integer
    SmallInt(i16),

    /// 32-bit signed integer
    Integer(i32),

    /// 64-bit signed integer
    BigInt(i64),

    /// 32-bit floating point
    Float(f32),

    /// 64-bit floating point
    Double(f64),

    /// UTF-8 string
    Text(String),

    /// Owned byte sequence
    Bytes(Vec<u8>),

    /// Fixed-point decimal
    Decimal(Decimal),

    /// Point in time, transmitted with microsecond precision
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    /// Check if this argument is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this argument as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this argument as an i64, widening smaller integers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::TinyInt(v) => Some(*v as i64),
            Self::SmallInt(v) => Some(*v as i64),
            Self::Integer(v) => Some(*v as i64),
            Self::BigInt(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::TinyInt(v) => write!(f, "{v}"),
            Self::SmallInt(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::BigInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}
