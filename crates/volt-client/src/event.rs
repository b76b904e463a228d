//! Connectivity events published by the client.

/// Why a connection went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectCause {
    /// The peer closed or the transport broke
    Closed,
    /// The connection was declared dead after missed responses
    Timeout,
}

/// Asynchronous connectivity notification.
///
/// `Lost` carries the number of redundant connections still alive after
/// the loss; zero means the client has no path to the database left.
/// Clients that reconnect announce recovered connections with
/// `Connected`.
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    Lost {
        host: String,
        remaining: usize,
        cause: DisconnectCause,
    },
    Connected {
        host: String,
    },
}
