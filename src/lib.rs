//! volt-connect library
//!
//! A sink connector that moves committed records from a partitioned log
//! into VoltDB through asynchronous procedure calls, advancing
//! consumption offsets only once every in-flight write has been durably
//! acknowledged.
//!
//! # Crates
//!
//! The workspace splits along the seams of the system:
//!
//! - `volt-types` - host-boundary record model and argument marshaling
//! - `record-formatter` - pluggable payload strategies and their registry
//! - `volt-client` - the procedure-call client boundary
//! - `sink-core` - in-flight tracking, connection monitoring, the
//!   submission loop and the checkpoint gate
//!
//! # Host Framework Usage
//!
//! ```ignore
//! let config = ConnectorConfig::from_props(&props)?;
//! let task = SinkTask::start(config, client).await?;
//!
//! task.submit_batch(&batch).await?;          // may raise a retriable signal
//! task.request_checkpoint(&offsets).await?;  // may reject the checkpoint
//! task.stop().await?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Validate a connector properties file and print the resolved configuration
//! volt-connect check --properties sink.properties
//!
//! # List every recognized configuration option
//! volt-connect options
//! ```

pub mod connector;
pub mod properties;

pub use connector::{SinkConnector, CONNECTOR_VERSION};
pub use properties::parse_properties;

// Re-export the member crates' public surface for convenience
pub use record_formatter::{
    Converter, DelimitedFormatter, FormatError, Formatter, FormatterRegistry, JsonConverter,
};
pub use sink_core::{
    keys, ConfigError, ConnectorConfig, InFlightTracker, PendingWriteKey, SinkError, SinkTask,
};
pub use volt_client::{
    CallResponse, ClientConfig, ClientError, CompletionHandle, ConnectionEvent, DisconnectCause,
    ProcedureClient, ResponseStatus, Submission,
};
pub use volt_types::{
    marshal_struct, FieldKind, FieldSchema, FieldValue, LogicalType, MarshalError, RecordSchema,
    RecordValue, SinkRecord, SqlValue, StructValue,
};
