//! Connector-level entry points.
//!
//! The connector object is what a host deploys: it validates the
//! property map once up front, fills in defaults for the identity
//! properties, and fans out one property map per task. Tasks themselves
//! are created by the host from those maps.

use sink_core::{keys, ConfigError, ConnectorConfig};
use std::collections::HashMap;
use tracing::info;

/// Connector version surfaced to the host framework.
pub const CONNECTOR_VERSION: &str = "volt-connect-sink/1.0.0";

/// Deploy-time connector handle.
pub struct SinkConnector {
    props: HashMap<String, String>,
}

impl SinkConnector {
    /// Validate the configuration and remember it for task fan-out.
    ///
    /// Missing identity properties (`name`, `tasks.max`,
    /// `connector.class`) get defaults; anything else invalid fails
    /// deployment immediately.
    pub fn start(mut props: HashMap<String, String>) -> Result<Self, ConfigError> {
        props
            .entry(keys::CONNECTOR_NAME.to_string())
            .or_insert_with(|| ConnectorConfig::DEFAULT_NAME.to_string());
        props
            .entry(keys::TASKS_MAX.to_string())
            .or_insert_with(|| "1".to_string());
        props
            .entry(keys::CONNECTOR_CLASS.to_string())
            .or_insert_with(|| ConnectorConfig::DEFAULT_CONNECTOR_CLASS.to_string());

        let config = ConnectorConfig::from_props(&props)?;
        info!(
            "connector '{}' configured for {} task(s)",
            config.name, config.tasks_max
        );
        Ok(Self { props })
    }

    /// One property map per task, identical across tasks.
    pub fn task_configs(&self, max_tasks: usize) -> Vec<HashMap<String, String>> {
        vec![self.props.clone(); max_tasks]
    }

    /// The validated, typed configuration.
    pub fn config(&self) -> Result<ConnectorConfig, ConfigError> {
        ConnectorConfig::from_props(&self.props)
    }

    pub fn version(&self) -> &'static str {
        CONNECTOR_VERSION
    }
}
