//! Error types for the client boundary.

use thiserror::Error;

/// Failure reported by the procedure-call client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Every connection to the database is gone. Submissions that hit
    /// this abort the whole batch.
    #[error("no connections to the database")]
    NoConnections,

    #[error("could not create connection to {host}: {message}")]
    ConnectionFailed { host: String, message: String },

    #[error("client is closed")]
    Closed,
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
