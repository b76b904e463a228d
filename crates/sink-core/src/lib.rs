//! Batch-commit synchronization core for volt-connect.
//!
//! Tracks which in-flight procedure calls are still unacknowledged,
//! blocks offset checkpoints until they settle, and reacts to
//! connectivity loss so no offset ever advances past data that was not
//! durably written.
//!
//! ```text
//! batch → SinkTask::submit_batch (marshal, register, submit)
//!       → completion watcher unregisters on acknowledgement
//!       → SinkTask::request_checkpoint gates on tracker emptiness
//! ```
//!
//! # Modules
//!
//! - [`tracker`] - Concurrent set of pending-write keys
//! - [`monitor`] - Atomic all-connections-lost flag fed by client events
//! - [`task`] - Submission loop, flush barrier, lifecycle
//! - [`config`] - Typed connector configuration from host properties
//! - [`error`] - Host-facing error signals

pub mod config;
pub mod error;
pub mod log;
pub mod monitor;
pub mod task;
pub mod tracker;

pub use config::{keys, ConfigError, ConnectorConfig};
pub use error::{RecordError, SinkError};
pub use monitor::ConnectionMonitor;
pub use task::SinkTask;
pub use tracker::{InFlightTracker, PendingWriteKey};
