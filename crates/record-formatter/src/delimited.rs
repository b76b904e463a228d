//! Delimited-text formatter covering the `csv` and `tsv` types.

use crate::error::{FormatError, Result};
use crate::Formatter;
use volt_types::SqlValue;

/// Marker for an explicit SQL NULL in delimited payloads.
const NULL_FIELD: &str = "\\N";

/// Splits one delimited line into positional string arguments.
///
/// Fields are passed to the procedure as text; the database coerces them
/// to the declared parameter types. A field consisting of the literal
/// `\N` marker becomes a NULL argument.
pub struct DelimitedFormatter {
    delimiter: u8,
}

impl DelimitedFormatter {
    /// Comma-delimited formatter (`csv` type).
    pub fn csv() -> Self {
        Self { delimiter: b',' }
    }

    /// Tab-delimited formatter (`tsv` type).
    pub fn tsv() -> Self {
        Self { delimiter: b'\t' }
    }
}

impl Formatter for DelimitedFormatter {
    fn transform(&self, data: &str) -> Result<Vec<SqlValue>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(data.as_bytes());

        let mut rows = reader.records();
        let row = match rows.next() {
            Some(row) => row.map_err(|e| FormatError::Malformed(e.to_string()))?,
            None => return Err(FormatError::EmptyPayload),
        };
        if rows.next().is_some() {
            return Err(FormatError::Malformed(
                "payload contains more than one row".to_string(),
            ));
        }

        Ok(row
            .iter()
            .map(|field| {
                if field == NULL_FIELD {
                    SqlValue::Null
                } else {
                    SqlValue::Text(field.to_string())
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_line_to_arguments() {
        let args = DelimitedFormatter::csv().transform("1,alice,2.5").unwrap();
        assert_eq!(
            args,
            vec![
                SqlValue::Text("1".to_string()),
                SqlValue::Text("alice".to_string()),
                SqlValue::Text("2.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_quoted_field_keeps_delimiter() {
        let args = DelimitedFormatter::csv()
            .transform("1,\"a,b\",x")
            .unwrap();
        assert_eq!(args[1], SqlValue::Text("a,b".to_string()));
    }

    #[test]
    fn test_null_marker() {
        let args = DelimitedFormatter::csv().transform("1,\\N,x").unwrap();
        assert_eq!(args[1], SqlValue::Null);
    }

    #[test]
    fn test_tsv_delimiter() {
        let args = DelimitedFormatter::tsv().transform("1\talice").unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args[1], SqlValue::Text("alice".to_string()));
    }

    #[test]
    fn test_empty_payload_rejected() {
        let err = DelimitedFormatter::csv().transform("").unwrap_err();
        assert!(matches!(err, FormatError::EmptyPayload));
    }

    #[test]
    fn test_multi_row_payload_rejected() {
        let err = DelimitedFormatter::csv().transform("1,a\n2,b").unwrap_err();
        assert!(matches!(err, FormatError::Malformed(_)));
    }
}
