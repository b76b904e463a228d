//! Scripted in-memory client for tests.
//!
//! Stands in for the wire-level client: each call consumes the next
//! scripted outcome (complete after a delay, reject locally, fail with
//! `NoConnections`, or hold until released), completions are delivered on
//! spawned tasks exactly like a real client's callback threads, and
//! `drain` waits until every accepted call has settled at the client
//! layer. Connectivity events are emitted on demand by the test.

use crate::client::{CompletionHandle, ProcedureClient, Submission};
use crate::error::{ClientError, Result};
use crate::event::ConnectionEvent;
use crate::response::{CallResponse, ResponseStatus};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};
use tracing::debug;
use volt_types::SqlValue;

/// Scripted outcome for one `call_procedure` invocation.
#[derive(Debug)]
pub enum CallScript {
    /// Accept and deliver a response after `delay`
    Complete {
        status: ResponseStatus,
        delay: Duration,
    },
    /// Refuse locally (backpressure); no completion will fire
    Reject,
    /// Fail the submission with `ClientError::NoConnections`
    FailNoConnections,
    /// Accept but deliver no response until [`ScriptedClient::release_held`]
    Hold,
}

/// One recorded `call_procedure` invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub procedure: String,
    pub args: Vec<SqlValue>,
}

struct Inner {
    script: Mutex<VecDeque<CallScript>>,
    invocations: Mutex<Vec<Invocation>>,
    held: Mutex<Vec<oneshot::Sender<CallResponse>>>,
    connections: Mutex<Vec<String>>,
    outstanding: Mutex<usize>,
    refuse_connections: AtomicBool,
    closed: AtomicBool,
    events: broadcast::Sender<ConnectionEvent>,
}

/// Cheaply cloneable handle to one scripted client instance.
#[derive(Clone)]
pub struct ScriptedClient {
    inner: Arc<Inner>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            inner: Arc::new(Inner {
                script: Mutex::new(VecDeque::new()),
                invocations: Mutex::new(Vec::new()),
                held: Mutex::new(Vec::new()),
                connections: Mutex::new(Vec::new()),
                outstanding: Mutex::new(0),
                refuse_connections: AtomicBool::new(false),
                closed: AtomicBool::new(false),
                events,
            }),
        }
    }

    /// Queue the outcome for the next unscripted call. Calls beyond the
    /// script complete successfully right away.
    pub fn script_call(&self, entry: CallScript) {
        self.inner.script.lock().unwrap().push_back(entry);
    }

    /// Deliver successful responses to every held call.
    pub fn release_held(&self) {
        let held: Vec<_> = self.inner.held.lock().unwrap().drain(..).collect();
        for tx in held {
            let _ = tx.send(CallResponse::success());
            self.finish_call();
        }
    }

    /// Emit a connectivity event to all subscribers.
    pub fn emit(&self, event: ConnectionEvent) {
        let _ = self.inner.events.send(event);
    }

    /// Make subsequent `create_connection` calls fail.
    pub fn refuse_connections(&self) {
        self.inner.refuse_connections.store(true, Ordering::SeqCst);
    }

    /// Every invocation recorded so far.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.inner.invocations.lock().unwrap().clone()
    }

    /// Hosts a connection was created to.
    pub fn connections(&self) -> Vec<String> {
        self.inner.connections.lock().unwrap().clone()
    }

    /// Accepted calls whose response has not been delivered yet.
    pub fn outstanding(&self) -> usize {
        *self.inner.outstanding.lock().unwrap()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    fn begin_call(&self) {
        *self.inner.outstanding.lock().unwrap() += 1;
    }

    fn finish_call(&self) {
        *self.inner.outstanding.lock().unwrap() -= 1;
    }
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProcedureClient for ScriptedClient {
    async fn create_connection(&self, host: &str) -> Result<()> {
        if self.inner.refuse_connections.load(Ordering::SeqCst) {
            return Err(ClientError::ConnectionFailed {
                host: host.to_string(),
                message: "connection refused by script".to_string(),
            });
        }
        self.inner
            .connections
            .lock()
            .unwrap()
            .push(host.to_string());
        Ok(())
    }

    async fn call_procedure(&self, procedure: &str, args: Vec<SqlValue>) -> Result<Submission> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(ClientError::Closed);
        }
        self.inner.invocations.lock().unwrap().push(Invocation {
            procedure: procedure.to_string(),
            args,
        });

        let entry = self
            .inner
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(CallScript::Complete {
                status: ResponseStatus::Success,
                delay: Duration::ZERO,
            });
        debug!("scripted call to '{procedure}': {entry:?}");

        match entry {
            CallScript::Reject => Ok(Submission::Rejected),
            CallScript::FailNoConnections => Err(ClientError::NoConnections),
            CallScript::Hold => {
                let (tx, handle) = CompletionHandle::channel();
                self.begin_call();
                self.inner.held.lock().unwrap().push(tx);
                Ok(Submission::Accepted(handle))
            }
            CallScript::Complete { status, delay } => {
                let (tx, handle) = CompletionHandle::channel();
                self.begin_call();
                let client = self.clone();
                tokio::spawn(async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let _ = tx.send(CallResponse::with_status(status));
                    client.finish_call();
                });
                Ok(Submission::Accepted(handle))
            }
        }
    }

    async fn drain(&self) -> Result<()> {
        // Settles once every accepted call has delivered its response.
        loop {
            if *self.inner.outstanding.lock().unwrap() == 0 {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    async fn close(&self) -> Result<()> {
        self.inner.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn connection_events(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.inner.events.subscribe()
    }
}
