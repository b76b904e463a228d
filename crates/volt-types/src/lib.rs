//! Record model and procedure-argument marshaling for volt-connect.
//!
//! This crate defines the types that cross the boundary between the host
//! log-consumption framework and the sink task, and the conversion of one
//! inbound record into the ordered argument vector of a procedure call:
//!
//! ```text
//! SinkRecord (schema-typed)  → marshal_struct → Vec<SqlValue>
//! SinkRecord (raw bytes)     → converter/formatter strategies (record-formatter crate)
//! ```
//!
//! # Modules
//!
//! - [`record`] - Sink records as delivered by the host framework
//! - [`schema`] - Field schemas, logical types, and struct values
//! - [`value`] - The procedure-argument value enum
//! - [`marshal`] - Schema-driven marshaling into argument vectors
//! - [`error`] - Record-level marshaling errors

pub mod error;
pub mod marshal;
pub mod record;
pub mod schema;
pub mod value;

pub use error::MarshalError;
pub use marshal::marshal_struct;
pub use record::{RecordValue, SinkRecord};
pub use schema::{FieldKind, FieldSchema, FieldValue, LogicalType, RecordSchema, StructValue};
pub use value::SqlValue;
