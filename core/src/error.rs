//! Terminal request failures.
//!
//! # Design
//! Only the transport driver produces errors, and exactly one per request.
//! Timeouts get their own variant so callers can tell "the server never
//! answered in time" apart from "the connection failed" and apply their own
//! retry policy. Both variants carry the normalized config for context.
//! A non-2xx status is not an error: it arrives as an ordinary `Response`.

use thiserror::Error;

use crate::http::RequestConfig;

/// Errors returned by [`request`](crate::request).
#[derive(Debug, Error)]
pub enum RequestError {
    /// The transport reported a connection-level failure, or went away
    /// without reporting any outcome.
    #[error("Network Error")]
    Network { config: Box<RequestConfig> },

    /// The transport gave up after the configured timeout.
    #[error("Timeout of {timeout} ms exceeded")]
    Timeout {
        config: Box<RequestConfig>,
        /// The configured timeout, in milliseconds.
        timeout: u64,
    },
}

impl RequestError {
    /// The normalized config of the failed request.
    pub fn config(&self) -> &RequestConfig {
        match self {
            RequestError::Network { config } | RequestError::Timeout { config, .. } => config,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RequestError::Timeout { .. })
    }
}
