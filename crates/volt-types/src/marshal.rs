//! Schema-driven marshaling into procedure argument vectors.
//!
//! Fields are visited in the schema's declared order. A field carrying a
//! logical type is resolved from its native representation to the wire
//! representation first; all other fields go through a primitive
//! projection by their declared kind. Any failure fails the whole record.

use crate::error::{MarshalError, Result};
use crate::schema::{FieldKind, FieldSchema, FieldValue, LogicalType, StructValue};
use crate::value::SqlValue;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Convert a schema-typed record value into an ordered argument vector.
///
/// Null field values pass through as [`SqlValue::Null`] without coercion.
/// Byte-sequence fields are materialized into owned vectors; the source
/// buffer's lifetime is not guaranteed beyond the submission attempt.
pub fn marshal_struct(value: &StructValue) -> Result<Vec<SqlValue>> {
    if value.values.len() != value.schema.fields.len() {
        return Err(MarshalError::ValueCountMismatch {
            values: value.values.len(),
            fields: value.schema.fields.len(),
        });
    }

    let mut args = Vec::with_capacity(value.values.len());
    for (field, raw) in value.schema.fields.iter().zip(&value.values) {
        args.push(marshal_field(field, raw)?);
    }
    Ok(args)
}

fn marshal_field(field: &FieldSchema, raw: &FieldValue) -> Result<SqlValue> {
    if matches!(raw, FieldValue::Null) {
        return Ok(SqlValue::Null);
    }

    match field.logical {
        Some(logical) => resolve_logical(field, logical, raw),
        None => project_primitive(field, raw),
    }
}

/// Resolve a logical-type value to its procedure-call wire representation.
fn resolve_logical(field: &FieldSchema, logical: LogicalType, raw: &FieldValue) -> Result<SqlValue> {
    match (logical, raw) {
        (LogicalType::Decimal { scale }, FieldValue::Bytes(unscaled)) => {
            decimal_from_unscaled(&field.name, unscaled, scale).map(SqlValue::Decimal)
        }
        (LogicalType::Date, FieldValue::Int32(days)) => {
            let seconds = i64::from(*days) * 86_400;
            let ts = DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| {
                MarshalError::TimestampOutOfRange {
                    field: field.name.clone(),
                    value: i64::from(*days),
                }
            })?;
            Ok(SqlValue::Timestamp(ts))
        }
        (LogicalType::Time, FieldValue::Int32(millis)) => {
            let ts = DateTime::<Utc>::from_timestamp_millis(i64::from(*millis)).ok_or_else(
                || MarshalError::TimestampOutOfRange {
                    field: field.name.clone(),
                    value: i64::from(*millis),
                },
            )?;
            Ok(SqlValue::Timestamp(ts))
        }
        (LogicalType::Timestamp, FieldValue::Int64(millis)) => {
            let ts = DateTime::<Utc>::from_timestamp_millis(*millis).ok_or_else(|| {
                MarshalError::TimestampOutOfRange {
                    field: field.name.clone(),
                    value: *millis,
                }
            })?;
            Ok(SqlValue::Timestamp(ts))
        }
        (logical, raw) => Err(MarshalError::TypeMismatch {
            field: field.name.clone(),
            expected: logical.as_str(),
            actual: raw.type_name(),
        }),
    }
}

/// Project a raw value by the field's declared primitive kind.
fn project_primitive(field: &FieldSchema, raw: &FieldValue) -> Result<SqlValue> {
    match (field.kind, raw) {
        (FieldKind::Boolean, _) => Err(MarshalError::UnsupportedKind {
            field: field.name.clone(),
            kind: FieldKind::Boolean.as_str(),
        }),
        (FieldKind::Int8, FieldValue::Int8(v)) => Ok(SqlValue::TinyInt(*v)),
        (FieldKind::Int16, FieldValue::Int16(v)) => Ok(SqlValue::SmallInt(*v)),
        (FieldKind::Int32, FieldValue::Int32(v)) => Ok(SqlValue::Integer(*v)),
        (FieldKind::Int64, FieldValue::Int64(v)) => Ok(SqlValue::BigInt(*v)),
        (FieldKind::Float32, FieldValue::Float32(v)) => Ok(SqlValue::Float(*v)),
        (FieldKind::Float64, FieldValue::Float64(v)) => Ok(SqlValue::Double(*v)),
        (FieldKind::String, FieldValue::String(s)) => Ok(SqlValue::Text(s.clone())),
        // Materialize an owned copy; the view may not outlive the call.
        (FieldKind::Bytes, FieldValue::Bytes(b)) => Ok(SqlValue::Bytes(b.to_vec())),
        (kind, raw) => Err(MarshalError::TypeMismatch {
            field: field.name.clone(),
            expected: kind.as_str(),
            actual: raw.type_name(),
        }),
    }
}

/// Build a decimal from big-endian two's-complement unscaled bytes.
fn decimal_from_unscaled(field: &str, unscaled: &[u8], scale: u32) -> Result<Decimal> {
    if unscaled.is_empty() || unscaled.len() > 16 {
        return Err(MarshalError::InvalidDecimal {
            field: field.to_string(),
            message: format!("unscaled value has {} bytes", unscaled.len()),
        });
    }

    let negative = unscaled[0] & 0x80 != 0;
    let mut buf = [if negative { 0xff } else { 0x00 }; 16];
    buf[16 - unscaled.len()..].copy_from_slice(unscaled);
    let mantissa = i128::from_be_bytes(buf);

    Decimal::try_from_i128_with_scale(mantissa, scale).map_err(|e| MarshalError::InvalidDecimal {
        field: field.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RecordSchema, StructValue};
    use bytes::Bytes;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn single_field(schema: FieldSchema, value: FieldValue) -> StructValue {
        StructValue::new(RecordSchema::new(vec![schema]), vec![value])
    }

    #[test]
    fn test_decimal_logical_type() {
        // 123456 at scale 2 → 1234.56
        let unscaled = 123456i32.to_be_bytes().to_vec();
        let value = single_field(
            FieldSchema::new("price", FieldKind::Bytes)
                .with_logical(LogicalType::Decimal { scale: 2 }),
            FieldValue::Bytes(Bytes::from(unscaled)),
        );
        let args = marshal_struct(&value).unwrap();
        assert_eq!(
            args,
            vec![SqlValue::Decimal(Decimal::from_str("1234.56").unwrap())]
        );
    }

    #[test]
    fn test_decimal_negative_unscaled() {
        let unscaled = (-255i16).to_be_bytes().to_vec();
        let value = single_field(
            FieldSchema::new("delta", FieldKind::Bytes)
                .with_logical(LogicalType::Decimal { scale: 1 }),
            FieldValue::Bytes(Bytes::from(unscaled)),
        );
        let args = marshal_struct(&value).unwrap();
        assert_eq!(
            args,
            vec![SqlValue::Decimal(Decimal::from_str("-25.5").unwrap())]
        );
    }

    #[test]
    fn test_date_logical_type() {
        // 2024-01-01 is 19723 days after the epoch
        let value = single_field(
            FieldSchema::new("day", FieldKind::Int32).with_logical(LogicalType::Date),
            FieldValue::Int32(19723),
        );
        let args = marshal_struct(&value).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(args, vec![SqlValue::Timestamp(expected)]);
    }

    #[test]
    fn test_time_logical_type() {
        // 10:00:00.500 after midnight
        let millis = (10 * 3600) * 1000 + 500;
        let value = single_field(
            FieldSchema::new("at", FieldKind::Int32).with_logical(LogicalType::Time),
            FieldValue::Int32(millis),
        );
        let args = marshal_struct(&value).unwrap();
        let expected = Utc
            .with_ymd_and_hms(1970, 1, 1, 10, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(500))
            .unwrap();
        assert_eq!(args, vec![SqlValue::Timestamp(expected)]);
    }

    #[test]
    fn test_timestamp_logical_type() {
        let value = single_field(
            FieldSchema::new("created", FieldKind::Int64).with_logical(LogicalType::Timestamp),
            FieldValue::Int64(1_718_451_045_500),
        );
        let args = marshal_struct(&value).unwrap();
        let expected = DateTime::<Utc>::from_timestamp_millis(1_718_451_045_500).unwrap();
        assert_eq!(args, vec![SqlValue::Timestamp(expected)]);
    }

    #[test]
    fn test_logical_type_mismatch_fails() {
        // A timestamp logical type over a string value is a contract break.
        let value = single_field(
            FieldSchema::new("created", FieldKind::Int64).with_logical(LogicalType::Timestamp),
            FieldValue::String("2024-01-01".to_string()),
        );
        let err = marshal_struct(&value).unwrap_err();
        assert!(matches!(err, MarshalError::TypeMismatch { .. }));
    }

    #[test]
    fn test_boolean_field_rejected() {
        // Boolean must fail the record, never coerce to 0/1.
        let value = single_field(
            FieldSchema::new("active", FieldKind::Boolean),
            FieldValue::Bool(true),
        );
        let err = marshal_struct(&value).unwrap_err();
        assert!(matches!(err, MarshalError::UnsupportedKind { kind, .. } if kind == "boolean"));
    }

    #[test]
    fn test_null_passthrough() {
        let value = single_field(
            FieldSchema::new("note", FieldKind::String),
            FieldValue::Null,
        );
        let args = marshal_struct(&value).unwrap();
        assert_eq!(args, vec![SqlValue::Null]);
    }

    #[test]
    fn test_null_under_logical_type_passthrough() {
        let value = single_field(
            FieldSchema::new("created", FieldKind::Int64).with_logical(LogicalType::Timestamp),
            FieldValue::Null,
        );
        let args = marshal_struct(&value).unwrap();
        assert_eq!(args, vec![SqlValue::Null]);
    }

    #[test]
    fn test_bytes_materialized_owned() {
        let payload = Bytes::from_static(b"\x01\x02\x03");
        let value = single_field(
            FieldSchema::new("blob", FieldKind::Bytes),
            FieldValue::Bytes(payload),
        );
        let args = marshal_struct(&value).unwrap();
        assert_eq!(args, vec![SqlValue::Bytes(vec![1, 2, 3])]);
    }

    #[test]
    fn test_fields_marshaled_in_declared_order() {
        let schema = RecordSchema::new(vec![
            FieldSchema::new("id", FieldKind::Int64),
            FieldSchema::new("name", FieldKind::String),
            FieldSchema::new("score", FieldKind::Float64),
        ]);
        let value = StructValue::new(
            schema,
            vec![
                FieldValue::Int64(7),
                FieldValue::String("seven".to_string()),
                FieldValue::Float64(0.5),
            ],
        );
        let args = marshal_struct(&value).unwrap();
        assert_eq!(
            args,
            vec![
                SqlValue::BigInt(7),
                SqlValue::Text("seven".to_string()),
                SqlValue::Double(0.5),
            ]
        );
    }

    #[test]
    fn test_primitive_kind_mismatch_fails() {
        let value = single_field(
            FieldSchema::new("id", FieldKind::Int64),
            FieldValue::String("7".to_string()),
        );
        let err = marshal_struct(&value).unwrap_err();
        assert!(matches!(err, MarshalError::TypeMismatch { .. }));
    }

    #[test]
    fn test_value_count_mismatch_fails() {
        let schema = RecordSchema::new(vec![FieldSchema::new("id", FieldKind::Int64)]);
        let value = StructValue::new(schema, vec![]);
        let err = marshal_struct(&value).unwrap_err();
        assert!(matches!(err, MarshalError::ValueCountMismatch { .. }));
    }
}
