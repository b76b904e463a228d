//! Error types for the sink task.

use crate::config::ConfigError;
use record_formatter::FormatError;
use thiserror::Error;
use volt_client::ClientError;
use volt_types::MarshalError;

/// Host-facing task failure.
///
/// `is_retriable` separates the signals: a retriable error asks the host
/// framework to pause and redeliver the current batch; anything else is
/// fatal for the attempt and surfaces to the host unchanged.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("all client connections to the database have been lost")]
    ConnectionLost,

    #[error("batch aborted: {0}")]
    Retriable(String),

    #[error("checkpoint rejected: {outstanding} write(s) still unacknowledged")]
    Uncommitted { outstanding: usize },

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl SinkError {
    /// True when the host framework should redeliver the batch rather
    /// than fail the task.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Retriable(_))
    }
}

/// Failure preparing one record's argument vector.
///
/// Record-level: the offending message is skipped and the batch
/// continues.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error(transparent)]
    Marshal(#[from] MarshalError),

    #[error(transparent)]
    Format(#[from] FormatError),
}
