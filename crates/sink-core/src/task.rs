//! The sink task: submission loop, checkpoint gate, lifecycle.

use crate::config::ConnectorConfig;
use crate::error::{RecordError, SinkError};
use crate::log::RateLimiter;
use crate::monitor::ConnectionMonitor;
use crate::tracker::{InFlightTracker, PendingWriteKey};
use record_formatter::{Converter, FormatError, Formatter, FormatterRegistry};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};
use volt_client::{ProcedureClient, Submission};
use volt_types::{marshal_struct, RecordValue, SinkRecord, SqlValue};

/// Window for suppressing repeated per-record error logs.
const SUPPRESS_INTERVAL: Duration = Duration::from_secs(10);

/// Drain ceiling applied when no response timeout is configured.
const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Checkpoint polling backoff bounds.
const FLUSH_BACKOFF_INITIAL: Duration = Duration::from_millis(50);
const FLUSH_BACKOFF_MAX: Duration = Duration::from_millis(500);

/// One sink task instance.
///
/// Exclusively owns its in-flight tracker, connection flag, batch counter
/// and client handle; instances are independent and never share state.
/// The host framework drives `submit_batch` and `request_checkpoint`
/// sequentially per instance, while completion watchers run concurrently
/// on their own tasks.
pub struct SinkTask<C> {
    client: Arc<C>,
    config: ConnectorConfig,
    converter: Box<dyn Converter>,
    formatter: Box<dyn Formatter>,
    tracker: Arc<InFlightTracker>,
    monitor: ConnectionMonitor,
    batch_count: AtomicU64,
    skip_log: RateLimiter,
}

impl<C: ProcedureClient> SinkTask<C> {
    /// Start a task with the built-in strategy registry.
    pub async fn start(config: ConnectorConfig, client: C) -> Result<Self, SinkError> {
        Self::start_with_registry(config, &FormatterRegistry::with_defaults(), client).await
    }

    /// Start a task resolving strategies from a caller-provided registry.
    ///
    /// Resolves the configured formatter and converter, connects to every
    /// configured server, and spawns the connection monitor. Any failure
    /// here is fatal; nothing is retried.
    pub async fn start_with_registry(
        config: ConnectorConfig,
        registry: &FormatterRegistry,
        client: C,
    ) -> Result<Self, SinkError> {
        let formatter = registry
            .create_formatter(&config.formatter_factory, &config.formatter_type)
            .map_err(|e| crate::config::ConfigError::Strategy(e.to_string()))?;
        let converter = registry
            .create_converter(&config.converter)
            .map_err(|e| crate::config::ConfigError::Strategy(e.to_string()))?;

        for host in &config.servers {
            client.create_connection(host.trim()).await?;
        }

        let monitor = ConnectionMonitor::spawn(client.connection_events());
        info!(
            "sink task started: procedure={}, servers={:?}",
            config.procedure, config.servers
        );

        Ok(Self {
            client: Arc::new(client),
            config,
            converter,
            formatter,
            tracker: Arc::new(InFlightTracker::new()),
            monitor,
            batch_count: AtomicU64::new(0),
            skip_log: RateLimiter::new(SUPPRESS_INTERVAL),
        })
    }

    /// Submit one batch of records.
    ///
    /// Per record: check connectivity, marshal, register the pending
    /// write, submit. Format failures skip the record; connectivity
    /// failures abort the whole batch with a retriable error after
    /// clearing every pending key.
    pub async fn submit_batch(&self, records: &[SinkRecord]) -> Result<(), SinkError> {
        if records.is_empty() {
            return Ok(());
        }

        for record in records {
            if self.monitor.is_lost() {
                return Err(self.abort_batch("all client connections have been lost"));
            }

            self.batch_count.fetch_add(1, Ordering::SeqCst);
            let key = PendingWriteKey::from(record);

            let args = match self.prepare_arguments(record) {
                Ok(args) => args,
                Err(e) => {
                    if self.skip_log.allow() {
                        error!("skipping record {key}: {e}");
                    }
                    continue;
                }
            };

            self.tracker.register(key);
            match self.client.call_procedure(&self.config.procedure, args).await {
                Ok(Submission::Accepted(handle)) => {
                    let tracker = Arc::clone(&self.tracker);
                    tokio::spawn(async move {
                        match handle.response().await {
                            Some(response) if response.status.is_connection_failure() => {
                                // The write's fate is unknown, but the key
                                // still settles; it must not stay pending
                                // past the response.
                                warn!(
                                    "client response error for {key}: {:?}",
                                    response.status
                                );
                            }
                            Some(_) => {}
                            None => {
                                warn!("client dropped the completion for {key}");
                            }
                        }
                        tracker.unregister(&key);
                    });
                }
                Ok(Submission::Rejected) => {
                    // Local backpressure; no completion will ever fire.
                    debug!("submission rejected for {key}");
                    self.tracker.unregister(&key);
                }
                Err(volt_client::ClientError::NoConnections) => {
                    return Err(self.abort_batch("connection lost during submission"));
                }
                Err(e) => {
                    error!("procedure error for {key}: {e}");
                    self.tracker.unregister(&key);
                }
            }
        }

        Ok(())
    }

    /// Gate an offset checkpoint on every in-flight write having settled.
    ///
    /// With nothing accepted since the last checkpoint this is a no-op.
    /// Otherwise the client is drained within a bounded budget, the
    /// tracker is polled with backoff up to the configured retry ceiling,
    /// and the checkpoint is rejected if any write is still outstanding.
    /// The batch counter resets on every attempt regardless of outcome.
    pub async fn request_checkpoint(
        &self,
        offsets: &HashMap<i32, i64>,
    ) -> Result<(), SinkError> {
        let batch_count = self.batch_count.load(Ordering::SeqCst);
        if batch_count == 0 {
            return Ok(());
        }

        if self.monitor.is_lost() {
            return Err(SinkError::ConnectionLost);
        }

        match timeout(self.drain_budget(), self.client.drain()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("drain failed: {e}"),
            Err(_) => debug!("drain did not settle within the budget"),
        }

        let mut backoff = FLUSH_BACKOFF_INITIAL;
        for _ in 0..self.config.flush_retry_max {
            if self.tracker.is_empty() {
                break;
            }
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(FLUSH_BACKOFF_MAX);
        }

        if self.tracker.is_empty() {
            info!(
                "checkpointing {batch_count} record(s) across {} partition(s)",
                offsets.len()
            );
            self.batch_count.store(0, Ordering::SeqCst);
            Ok(())
        } else {
            let outstanding = self.tracker.len();
            self.batch_count.store(0, Ordering::SeqCst);
            self.tracker.clear();
            Err(SinkError::Uncommitted { outstanding })
        }
    }

    /// Drain outstanding writes best-effort, then release the client.
    ///
    /// A drain that cannot settle within the budget does not hold the
    /// client handle hostage; the task shuts down regardless.
    pub async fn stop(self) -> Result<(), SinkError> {
        match timeout(self.drain_budget(), self.client.drain()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("drain failed during shutdown: {e}"),
            Err(_) => warn!("shutdown drain did not settle, releasing the client"),
        }
        self.monitor.abort();
        self.client.close().await?;
        info!("sink task stopped");
        Ok(())
    }

    /// Writes currently registered and unacknowledged.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Records accepted since the last checkpoint attempt.
    pub fn batch_count(&self) -> u64 {
        self.batch_count.load(Ordering::SeqCst)
    }

    fn prepare_arguments(&self, record: &SinkRecord) -> Result<Vec<SqlValue>, RecordError> {
        match &record.value {
            RecordValue::Struct(value) => Ok(marshal_struct(value)?),
            RecordValue::Bytes(_) => {
                let payload = self.converter.convert(record)?;
                let text =
                    String::from_utf8(payload).map_err(|_| FormatError::InvalidUtf8)?;
                Ok(self.formatter.transform(&text)?)
            }
        }
    }

    fn abort_batch(&self, reason: &str) -> SinkError {
        self.tracker.clear();
        self.batch_count.store(0, Ordering::SeqCst);
        SinkError::Retriable(reason.to_string())
    }

    fn drain_budget(&self) -> Duration {
        if self.config.response_timeout_ms > 0 {
            Duration::from_millis(self.config.response_timeout_ms)
        } else {
            DEFAULT_DRAIN_TIMEOUT
        }
    }
}
