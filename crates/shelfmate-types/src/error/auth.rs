//! Authentication failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised by sign-in, registration and token refresh.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details", rename_all = "snake_case")]
pub enum AuthFailure {
    /// Email/password pair was rejected
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Registration attempted with an email that already has an account
    #[error("An account with this email already exists")]
    EmailAlreadyInUse,

    /// Refresh token is missing or was rejected; the user must sign in again
    #[error("Your session has expired, please sign in again")]
    SessionExpired,

    /// The user backed out of the provider's sign-in flow
    #[error("Sign-in with {provider} was cancelled")]
    OAuthCancelled {
        /// Provider name (`google`, `apple`)
        provider: String,
    },

    /// An authorized call was made without valid credentials
    #[error("You need to sign in to continue")]
    Unauthorized,
}

impl AuthFailure {
    /// Stable category tag.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "auth.invalid_credentials",
            Self::EmailAlreadyInUse => "auth.email_already_in_use",
            Self::SessionExpired => "auth.session_expired",
            Self::OAuthCancelled { .. } => "auth.oauth_cancelled",
            Self::Unauthorized => "auth.unauthorized",
        }
    }
}
