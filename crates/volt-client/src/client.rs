//! The procedure-call client trait.

use crate::error::Result;
use crate::event::ConnectionEvent;
use crate::response::CallResponse;
use tokio::sync::{broadcast, oneshot};
use volt_types::SqlValue;

/// Outcome of handing an invocation to the client.
#[derive(Debug)]
pub enum Submission {
    /// The call was queued; its completion event will be delivered
    /// through the handle exactly once.
    Accepted(CompletionHandle),
    /// The client could not accept the call locally (backpressure).
    /// No completion event will ever fire for it.
    Rejected,
}

/// Receives the completion event of one accepted invocation.
///
/// Completion events are delivered on the client's own tasks,
/// concurrently with whatever the submitter is doing.
#[derive(Debug)]
pub struct CompletionHandle {
    rx: oneshot::Receiver<CallResponse>,
}

impl CompletionHandle {
    /// Create a connected sender/handle pair.
    pub fn channel() -> (oneshot::Sender<CallResponse>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// Wait for the completion event. Returns `None` when the client was
    /// torn down before delivering a response; callers should treat that
    /// as the call having settled with an unknown outcome.
    pub async fn response(self) -> Option<CallResponse> {
        self.rx.await.ok()
    }
}

/// Asynchronous client for procedure invocations against the database.
///
/// Implementations own the wire protocol, redundant connections, and
/// reconnect policy. Source code in this repository only consumes the
/// trait; tests use the scripted implementation in [`crate::testing`].
///
/// # Usage Pattern
///
/// The sink task uses generics for zero-cost dispatch:
///
/// ```ignore
/// pub async fn start<C: ProcedureClient>(config: ConnectorConfig, client: C) -> Result<Self> {
///     for host in &config.servers {
///         client.create_connection(host).await?;
///     }
///     // ...
/// }
/// ```
#[async_trait::async_trait]
pub trait ProcedureClient: Send + Sync + 'static {
    /// Open a connection to one `host[:port]` entry.
    async fn create_connection(&self, host: &str) -> Result<()>;

    /// Submit an asynchronous procedure invocation.
    ///
    /// Returns [`Submission::Rejected`] for local backpressure and
    /// `Err(ClientError::NoConnections)` when every connection is gone.
    async fn call_procedure(&self, procedure: &str, args: Vec<SqlValue>) -> Result<Submission>;

    /// Block until every previously accepted invocation has been
    /// acknowledged at the client layer.
    async fn drain(&self) -> Result<()>;

    /// Release the client and its connections.
    async fn close(&self) -> Result<()>;

    /// Subscribe to connectivity-loss notifications.
    fn connection_events(&self) -> broadcast::Receiver<ConnectionEvent>;
}
