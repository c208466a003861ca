//! Tagged failure definitions for Shelfmate.
//!
//! Repository calls return `Result<T, Failure>` instead of panicking or
//! bubbling transport errors. Every failure is:
//!
//! - **Serializable** so it can be cached alongside queued work
//! - **Displayable** so the presentation layer can show `message()`
//! - **Matchable** so callers can branch on the domain and variant

mod auth;
mod network;
mod storage;
mod validation;

pub use auth::AuthFailure;
pub use network::NetworkFailure;
pub use storage::StorageFailure;
pub use validation::ValidationFailure;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified failure returned by every repository call.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "domain", content = "error", rename_all = "snake_case")]
pub enum Failure {
    /// Authentication or session failure
    #[error(transparent)]
    Auth(#[from] AuthFailure),

    /// Transport or server failure
    #[error(transparent)]
    Network(#[from] NetworkFailure),

    /// Input rejected locally or by the server
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Local persistence failure
    #[error(transparent)]
    Storage(#[from] StorageFailure),

    /// Anything that does not fit the categories above
    #[error("Something went wrong: {message}")]
    Unknown {
        /// Description of the failure
        message: String,
    },
}

/// Standard Result type using [`Failure`].
pub type Result<T> = std::result::Result<T, Failure>;

impl Failure {
    /// Build an `Unknown` failure from any message.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown { message: message.into() }
    }

    /// Message suitable for showing to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Stable category tag such as `auth.invalid_credentials`.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Auth(e) => e.tag(),
            Self::Network(e) => e.tag(),
            Self::Validation(e) => e.tag(),
            Self::Storage(e) => e.tag(),
            Self::Unknown { .. } => "unknown",
        }
    }

    /// Error code supplied by the server, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Network(e) => e.code(),
            Self::Validation(e) => e.code(),
            Self::Auth(_) | Self::Storage(_) | Self::Unknown { .. } => None,
        }
    }

    /// Whether retrying the same call later may succeed.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network(e) => e.is_transient(),
            Self::Auth(_) | Self::Validation(_) | Self::Storage(_) | Self::Unknown { .. } => false,
        }
    }

    /// Whether the user has to sign in again.
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Auth(AuthFailure::SessionExpired | AuthFailure::Unauthorized))
    }
}

impl From<serde_json::Error> for Failure {
    fn from(e: serde_json::Error) -> Self {
        Self::Network(NetworkFailure::InvalidResponse { message: e.to_string() })
    }
}

impl From<validator::ValidationErrors> for Failure {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(ValidationFailure::from(errors))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_serialization() {
        let err = Failure::Validation(ValidationFailure::NotFound {
            resource: "book".to_string(),
            id: "b-42".to_string(),
        });

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"domain\":\"validation\""));
        assert!(json.contains("b-42"));

        let deserialized: Failure = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_tags_and_flags() {
        let expired = Failure::from(AuthFailure::SessionExpired);
        assert_eq!(expired.tag(), "auth.session_expired");
        assert!(expired.requires_login());
        assert!(!expired.is_transient());

        let timeout = Failure::from(NetworkFailure::Timeout);
        assert_eq!(timeout.tag(), "network.timeout");
        assert!(timeout.is_transient());
        assert!(!timeout.requires_login());
    }

    #[test]
    fn test_server_code_passthrough() {
        let err = Failure::from(NetworkFailure::Server {
            status: 503,
            message: "maintenance".to_string(),
            code: Some("MAINTENANCE".to_string()),
        });
        assert_eq!(err.code(), Some("MAINTENANCE"));
        assert!(err.message().contains("maintenance"));
        assert_eq!(Failure::unknown("boom").code(), None);
    }
}
