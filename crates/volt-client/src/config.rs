//! Client configuration.

use serde::{Deserialize, Serialize};

/// Configuration handed to the wire-level client implementation.
///
/// Timeouts of zero leave the client's own defaults in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Database username
    pub username: String,
    /// Database password
    pub password: String,
    /// Re-establish connections automatically after a loss
    pub reconnect_on_loss: bool,
    /// Ceiling on waiting for any response, in milliseconds
    pub response_timeout_ms: u64,
    /// Ceiling on a single procedure call, in milliseconds
    pub procedure_timeout_ms: u64,
    /// Kerberos authentication module name, when enabled
    pub kerberos_module: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            reconnect_on_loss: true,
            response_timeout_ms: 0,
            procedure_timeout_ms: 0,
            kerberos_module: None,
        }
    }
}
