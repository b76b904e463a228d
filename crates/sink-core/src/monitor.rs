//! Connection state monitoring.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::warn;
use volt_client::ConnectionEvent;

/// Tracks whether every connection to the database is gone.
///
/// A spawned task consumes the client's connectivity events and keeps a
/// single atomic flag: a loss leaving zero connections asserts it, any
/// surviving or recovered connection deasserts it. Partial loss never
/// halts submission.
#[derive(Debug)]
pub struct ConnectionMonitor {
    lost: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl ConnectionMonitor {
    /// Spawn the monitor over a client's event subscription.
    pub fn spawn(mut events: broadcast::Receiver<ConnectionEvent>) -> Self {
        let lost = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&lost);
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(ConnectionEvent::Lost {
                        host, remaining, ..
                    }) => {
                        warn!(
                            "connection to {host} has been lost, {remaining} connection(s) remaining"
                        );
                        flag.store(remaining == 0, Ordering::SeqCst);
                    }
                    Ok(ConnectionEvent::Connected { .. }) => {
                        flag.store(false, Ordering::SeqCst);
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!("connection monitor lagged, {missed} event(s) dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Self { lost, handle }
    }

    /// True when every redundant connection is down.
    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::SeqCst)
    }

    /// Stop consuming events.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for ConnectionMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
