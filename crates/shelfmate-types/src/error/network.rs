//! Transport and server failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised while talking to the backend.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details", rename_all = "snake_case")]
pub enum NetworkFailure {
    /// Host unreachable or connection refused
    #[error("No internet connection")]
    NoConnection,

    /// Request exceeded the configured timeout
    #[error("The server took too long to respond")]
    Timeout,

    /// Server answered with a 5xx (or an unexpected) status
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
        /// Error code from the response body, if present
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },

    /// Server answered 429
    #[error("Too many requests, retry after {}s", retry_after_secs.map_or_else(|| "a few".to_string(), |s| s.to_string()))]
    RateLimited {
        /// Seconds to wait, from the `Retry-After` header
        retry_after_secs: Option<u64>,
    },

    /// Body could not be decoded into the expected record
    #[error("Unexpected response from server: {message}")]
    InvalidResponse {
        /// Decoder error
        message: String,
    },
}

impl NetworkFailure {
    /// Stable category tag.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::NoConnection => "network.no_connection",
            Self::Timeout => "network.timeout",
            Self::Server { .. } => "network.server",
            Self::RateLimited { .. } => "network.rate_limited",
            Self::InvalidResponse { .. } => "network.invalid_response",
        }
    }

    /// Server-supplied error code.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Server { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Decoding failures are permanent; everything else may clear up.
    pub const fn is_transient(&self) -> bool {
        !matches!(self, Self::InvalidResponse { .. })
    }
}
