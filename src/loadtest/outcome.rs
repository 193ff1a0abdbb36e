use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::RequestError;

/// Record of one finished attempt.
///
/// `error` holds the rendered transport error; a response with any status
/// code, 5xx included, leaves it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    /// Response status, or 0 when no response arrived.
    pub status: u16,
    pub latency: Duration,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl RequestOutcome {
    pub(crate) fn from_attempt(result: Result<u16, RequestError>, latency: Duration) -> Self {
        let (status, error) = match result {
            Ok(status) => (status, None),
            Err(err) => (0, Some(err.to_string())),
        };
        Self {
            status,
            latency,
            error,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
