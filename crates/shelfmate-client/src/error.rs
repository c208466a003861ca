//! Error types for the Shelfmate client transport.
//!
//! `ClientError` describes what went wrong on the wire. Repositories convert
//! it into a tagged [`Failure`] before returning to callers.

use serde::Deserialize;
use shelfmate_types::{AuthFailure, Failure, NetworkFailure, StorageFailure, ValidationFailure};
use thiserror::Error;

/// Errors that can occur when talking to the Shelfmate API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failed to establish a connection to the server.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// HTTP request failed for another reason.
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Server returned a body that does not match the expected record.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Server returned 401.
    #[error("Unauthorized")]
    Unauthorized,

    /// No tokens are stored.
    #[error("Not signed in")]
    NotSignedIn,

    /// Refresh token was missing or rejected; tokens have been cleared.
    #[error("Session expired")]
    SessionExpired,

    /// Server returned 404.
    #[error("Not found: {path}")]
    NotFound {
        /// Request path that was not found.
        path: String,
    },

    /// Server returned 409.
    #[error("Conflict: {message}")]
    Conflict {
        /// Error message from server.
        message: String,
        /// Error code from server.
        code: Option<String>,
    },

    /// Server returned 400 or 422.
    #[error("Rejected ({field}): {message}")]
    Rejected {
        /// Field named by the server, or `request`.
        field: String,
        /// Error message from server.
        message: String,
        /// Error code from server.
        code: Option<String>,
    },

    /// Server returned 429 Too Many Requests.
    #[error("Rate limited (429): retry after {retry_after:?}s")]
    RateLimited {
        /// Seconds to wait before retrying, if provided by server.
        retry_after: Option<u64>,
    },

    /// Server returned a 5xx or otherwise unexpected status.
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
        /// Error code from server.
        code: Option<String>,
    },

    /// Token store or key-value store failed.
    #[error(transparent)]
    Storage(#[from] StorageFailure),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connection(e.to_string())
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Request(e)
        }
    }
}

impl ClientError {
    /// Whether a retry of an idempotent request is worthwhile.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::ServerError { status: 500..=599, .. })
    }

    /// Convert into a failure, naming the resource for 404s.
    pub fn into_failure_for(self, resource: &str, id: &str) -> Failure {
        match self {
            Self::NotFound { .. } => {
                ValidationFailure::NotFound { resource: resource.to_string(), id: id.to_string() }
                    .into()
            },
            other => other.into(),
        }
    }
}

impl From<ClientError> for Failure {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Connection(_) => NetworkFailure::NoConnection.into(),
            ClientError::Timeout => NetworkFailure::Timeout.into(),
            ClientError::Request(err) => Self::unknown(err.to_string()),
            ClientError::InvalidResponse(message) => {
                NetworkFailure::InvalidResponse { message }.into()
            },
            ClientError::Unauthorized | ClientError::NotSignedIn => AuthFailure::Unauthorized.into(),
            ClientError::SessionExpired => AuthFailure::SessionExpired.into(),
            ClientError::NotFound { path } => {
                ValidationFailure::NotFound { resource: "resource".to_string(), id: path }.into()
            },
            ClientError::Conflict { message, code } => {
                ValidationFailure::Conflict { message, code }.into()
            },
            ClientError::Rejected { field, message, code } => {
                ValidationFailure::Field { field, message, code }.into()
            },
            ClientError::RateLimited { retry_after } => {
                NetworkFailure::RateLimited { retry_after_secs: retry_after }.into()
            },
            ClientError::ServerError { status, message, code } => {
                NetworkFailure::Server { status, message, code }.into()
            },
            ClientError::Storage(failure) => failure.into(),
        }
    }
}

/// Error envelope used by the backend: `{"error": {"code", "message", "field"}}`.
/// Flat `{"message": ...}` bodies are accepted too.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    error: ApiErrorBody,
}

impl ApiErrorBody {
    /// Parse an error body, falling back to the raw text as the message.
    pub(crate) fn parse(text: &str) -> Self {
        if let Ok(envelope) = serde_json::from_str::<Envelope>(text) {
            return envelope.error;
        }
        if let Ok(flat) = serde_json::from_str::<Self>(text) {
            if flat.message.is_some() || flat.code.is_some() {
                return flat;
            }
        }
        let trimmed = text.trim();
        Self {
            message: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn message_or(&self, fallback: &str) -> String {
        self.message.clone().unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope() {
        let body = ApiErrorBody::parse(
            r#"{"error":{"code":"TOO_SHORT","message":"too short","field":"text"}}"#,
        );
        assert_eq!(body.code.as_deref(), Some("TOO_SHORT"));
        assert_eq!(body.field.as_deref(), Some("text"));
    }

    #[test]
    fn test_parse_flat_and_plain() {
        let flat = ApiErrorBody::parse(r#"{"message":"nope"}"#);
        assert_eq!(flat.message.as_deref(), Some("nope"));

        let plain = ApiErrorBody::parse("Bad Gateway");
        assert_eq!(plain.message.as_deref(), Some("Bad Gateway"));

        let empty = ApiErrorBody::parse("");
        assert_eq!(empty.message_or("fallback"), "fallback");
    }

    #[test]
    fn test_failure_mapping() {
        let failure: Failure = ClientError::SessionExpired.into();
        assert!(failure.requires_login());

        let failure: Failure = ClientError::Connection("refused".to_string()).into();
        assert_eq!(failure, Failure::Network(NetworkFailure::NoConnection));

        let failure = ClientError::NotFound { path: "/books/b1".to_string() }
            .into_failure_for("book", "b1");
        assert_eq!(failure.tag(), "validation.not_found");
        assert!(failure.message().contains("b1"));
    }

    #[test]
    fn test_retryable() {
        assert!(ClientError::RateLimited { retry_after: None }.is_retryable());
        assert!(ClientError::ServerError { status: 503, message: String::new(), code: None }
            .is_retryable());
        assert!(!ClientError::Unauthorized.is_retryable());
    }
}
