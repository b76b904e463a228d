//! Connector configuration.
//!
//! The host framework hands the task a flat string property map;
//! [`ConnectorConfig::from_props`] turns it into a typed configuration,
//! applying documented defaults and failing fast on anything missing or
//! unparsable. Property accessors follow the original surface: values are
//! trimmed, empty values fall back to the default, and numeric values
//! must be non-negative integers.

use record_formatter::{DELIMITED_FORMATTER, JSON_CONVERTER};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use volt_client::ClientConfig;

/// Recognized property keys.
pub mod keys {
    pub const CONNECTOR_NAME: &str = "name";
    pub const CONNECTOR_CLASS: &str = "connector.class";
    pub const TASKS_MAX: &str = "tasks.max";
    pub const USER: &str = "voltdb.connection.user";
    pub const PASSWORD: &str = "voltdb.connection.password";
    pub const SERVERS: &str = "voltdb.servers";
    pub const PROCEDURE: &str = "voltdb.procedure";
    pub const FORMATTER_FACTORY: &str = "formatter.factory";
    pub const FORMATTER_TYPE: &str = "formatter.type";
    pub const CONVERTER: &str = "data.converter";
    pub const KERBEROS: &str = "kerberos.authentication";
    pub const AUTO_RECONNECT: &str = "auto.reconnect.onloss";
    pub const FLUSH_RETRY_MAX: &str = "flush.retry.max";
    pub const RESPONSE_TIMEOUT_MAX: &str = "response.timeout.max";
    pub const PROCEDURE_TIMEOUT_MAX: &str = "procedure.timeout.max";
}

/// Fatal startup configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required property '{0}'")]
    Missing(&'static str),

    #[error("invalid value '{value}' for property '{key}': expected a non-negative integer")]
    InvalidNumber { key: &'static str, value: String },

    #[error("strategy error: {0}")]
    Strategy(String),
}

/// Typed connector configuration with defaults applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Unique connector name
    pub name: String,
    /// Connector implementation identifier
    pub connector_class: String,
    /// Maximum number of parallel tasks
    pub tasks_max: u32,
    /// Database username
    pub username: String,
    /// Database password
    pub password: String,
    /// Database server nodes, one `host[:port]` entry each
    pub servers: Vec<String>,
    /// Procedure invoked for every record
    pub procedure: String,
    /// Formatter strategy identifier
    pub formatter_factory: String,
    /// Formatter sub-type, such as `csv` or `tsv`
    pub formatter_type: String,
    /// Converter strategy identifier
    pub converter: String,
    /// Kerberos authentication module name, when enabled
    pub kerberos: Option<String>,
    /// Re-establish connections automatically after a loss
    pub auto_reconnect: bool,
    /// Checkpoint polling ceiling after the drain
    pub flush_retry_max: u32,
    /// Client response timeout in milliseconds, zero for client default
    pub response_timeout_ms: u64,
    /// Procedure-call timeout in milliseconds, zero for client default
    pub procedure_timeout_ms: u64,
}

impl ConnectorConfig {
    pub const DEFAULT_NAME: &'static str = "volt-sink";
    pub const DEFAULT_CONNECTOR_CLASS: &'static str = "volt_connect::SinkConnector";
    pub const DEFAULT_FLUSH_RETRY_MAX: u32 = 3;

    /// Build a configuration from the host framework's property map.
    ///
    /// Missing server list or procedure name is a fatal error; everything
    /// else falls back to the documented default.
    pub fn from_props(props: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let servers_raw =
            get_string(props, keys::SERVERS, "").ok_or(ConfigError::Missing(keys::SERVERS))?;
        let servers: Vec<String> = servers_raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if servers.is_empty() {
            return Err(ConfigError::Missing(keys::SERVERS));
        }

        let procedure =
            get_string(props, keys::PROCEDURE, "").ok_or(ConfigError::Missing(keys::PROCEDURE))?;

        Ok(Self {
            name: get_string(props, keys::CONNECTOR_NAME, Self::DEFAULT_NAME)
                .unwrap_or_else(|| Self::DEFAULT_NAME.to_string()),
            connector_class: get_string(
                props,
                keys::CONNECTOR_CLASS,
                Self::DEFAULT_CONNECTOR_CLASS,
            )
            .unwrap_or_else(|| Self::DEFAULT_CONNECTOR_CLASS.to_string()),
            tasks_max: get_u32(props, keys::TASKS_MAX, 1)?,
            username: get_string(props, keys::USER, "").unwrap_or_default(),
            password: get_string(props, keys::PASSWORD, "").unwrap_or_default(),
            servers,
            procedure,
            formatter_factory: get_string(props, keys::FORMATTER_FACTORY, DELIMITED_FORMATTER)
                .unwrap_or_else(|| DELIMITED_FORMATTER.to_string()),
            formatter_type: get_string(props, keys::FORMATTER_TYPE, "csv")
                .unwrap_or_else(|| "csv".to_string()),
            converter: get_string(props, keys::CONVERTER, JSON_CONVERTER)
                .unwrap_or_else(|| JSON_CONVERTER.to_string()),
            kerberos: get_string(props, keys::KERBEROS, ""),
            auto_reconnect: get_string(props, keys::AUTO_RECONNECT, "true")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(true),
            flush_retry_max: get_u32(props, keys::FLUSH_RETRY_MAX, Self::DEFAULT_FLUSH_RETRY_MAX)?,
            response_timeout_ms: u64::from(get_u32(props, keys::RESPONSE_TIMEOUT_MAX, 0)?),
            procedure_timeout_ms: u64::from(get_u32(props, keys::PROCEDURE_TIMEOUT_MAX, 0)?),
        })
    }

    /// Configuration fields forwarded to the wire-level client.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            username: self.username.clone(),
            password: self.password.clone(),
            reconnect_on_loss: self.auto_reconnect,
            response_timeout_ms: self.response_timeout_ms,
            procedure_timeout_ms: self.procedure_timeout_ms,
            kerberos_module: self.kerberos.clone(),
        }
    }
}

/// Recognized options with their documentation, for tooling output.
pub fn recognized_options() -> &'static [(&'static str, &'static str)] {
    &[
        (keys::CONNECTOR_NAME, "Unique connector name."),
        (keys::CONNECTOR_CLASS, "Connector implementation identifier."),
        (
            keys::TASKS_MAX,
            "The maximum number of tasks that should be created for this connector.",
        ),
        (keys::USER, "The user name to connect to the database."),
        (keys::PASSWORD, "The password to connect to the database."),
        (keys::SERVERS, "A comma-separated list of database server nodes."),
        (
            keys::PROCEDURE,
            "The procedure name to be used to insert data into the database.",
        ),
        (
            keys::FORMATTER_FACTORY,
            "The formatter strategy used to convert record payloads.",
        ),
        (keys::FORMATTER_TYPE, "The type of formatter, such as csv or tsv."),
        (
            keys::CONVERTER,
            "The converter strategy for normalizing record values.",
        ),
        (keys::KERBEROS, "Kerberos authentication module name."),
        (
            keys::AUTO_RECONNECT,
            "Re-establish connections automatically after a loss.",
        ),
        (
            keys::FLUSH_RETRY_MAX,
            "Checkpoint polling ceiling after draining the client.",
        ),
        (
            keys::RESPONSE_TIMEOUT_MAX,
            "Client response timeout ceiling in milliseconds.",
        ),
        (
            keys::PROCEDURE_TIMEOUT_MAX,
            "Procedure call timeout ceiling in milliseconds.",
        ),
    ]
}

/// Trimmed string property; empty and whitespace-only values fall back.
/// Returns `None` when the fallback itself is empty.
fn get_string(props: &HashMap<String, String>, key: &str, default: &str) -> Option<String> {
    let value = match props.get(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim(),
        _ => default,
    };
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Non-negative numeric property.
fn get_u32(
    props: &HashMap<String, String>,
    key: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    match props.get(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                key,
                value: raw.trim().to_string(),
            })
        }
        _ => Ok(default),
    }
}
