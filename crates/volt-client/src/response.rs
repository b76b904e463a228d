//! Procedure-call responses.

/// Application status of a settled procedure invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// Procedure executed and was acknowledged
    Success,
    /// Procedure execution failed at the database
    Failure,
    /// Connection dropped before the response arrived; the write's
    /// database-side effect is unknown
    ConnectionLost,
    /// Response did not arrive within the client's response timeout
    ConnectionTimeout,
}

impl ResponseStatus {
    /// True for statuses reported when the connection failed while the
    /// call was outstanding.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::ConnectionLost | Self::ConnectionTimeout)
    }
}

/// Completion event delivered once per accepted invocation.
#[derive(Debug, Clone)]
pub struct CallResponse {
    pub status: ResponseStatus,
    /// Human-readable status detail from the database, if any
    pub status_detail: Option<String>,
}

impl CallResponse {
    pub fn success() -> Self {
        Self {
            status: ResponseStatus::Success,
            status_detail: None,
        }
    }

    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Failure,
            status_detail: Some(detail.into()),
        }
    }

    pub fn with_status(status: ResponseStatus) -> Self {
        Self {
            status,
            status_detail: None,
        }
    }
}
