//! Authentication request and response bodies.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::{TokenPair, User};

/// Body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Plain-text password (sent over TLS only)
    pub password: String,
}

/// Body for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct RegisterRequest {
    /// Account email
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Public handle
    #[validate(length(min = 3, max = 32, message = "must be between 3 and 32 characters"))]
    pub username: String,
    /// Plain-text password
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    /// Optional name shown instead of the username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 64, message = "must be at most 64 characters"))]
    pub display_name: Option<String>,
}

/// Body for `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshRequest {
    /// Stored refresh token
    pub refresh_token: String,
}

/// Body for `POST /auth/logout`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogoutRequest {
    /// Refresh token to revoke
    pub refresh_token: String,
}

/// Body for `POST /auth/oauth/{provider}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthRequest {
    /// Identity token returned by the provider's sign-in flow
    pub id_token: String,
}

/// Third-party identity providers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OAuthProvider {
    /// Google Sign-In
    Google,
    /// Sign in with Apple
    Apple,
}

impl OAuthProvider {
    /// Path segment used in `/auth/oauth/{provider}`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Apple => "apple",
        }
    }

    /// Parse from string.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Some(Self::Google),
            "apple" => Some(Self::Apple),
            _ => None,
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response of every token-issuing auth endpoint.
///
/// The server sends `expires_in` (seconds); it is converted to an absolute
/// `expires_at` when building the [`TokenPair`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// New access token
    pub access_token: String,
    /// New refresh token
    pub refresh_token: String,
    /// Access token lifetime in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Signed-in user; absent on `/auth/refresh`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl AuthResponse {
    /// Token pair with the expiry anchored to now.
    pub fn tokens(&self) -> TokenPair {
        TokenPair::new(self.access_token.clone(), self.refresh_token.clone(), self.expires_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::round_trip;

    fn valid_registration() -> RegisterRequest {
        RegisterRequest {
            email: "reader@example.com".to_string(),
            username: "reader".to_string(),
            password: "correct horse".to_string(),
            display_name: None,
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(valid_registration().validate().is_ok());

        let short_password = RegisterRequest { password: "short".to_string(), ..valid_registration() };
        assert!(short_password.validate().is_err());

        let bad_email = RegisterRequest { email: "not-an-email".to_string(), ..valid_registration() };
        assert!(bad_email.validate().is_err());

        let short_name = RegisterRequest { username: "ab".to_string(), ..valid_registration() };
        assert!(short_name.validate().is_err());
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!(OAuthProvider::from_string("Google"), Some(OAuthProvider::Google));
        assert_eq!(OAuthProvider::from_string("apple"), Some(OAuthProvider::Apple));
        assert_eq!(OAuthProvider::from_string("myspace"), None);
        assert_eq!(OAuthProvider::Apple.to_string(), "apple");
    }

    #[test]
    fn test_round_trip() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","email":"reader@example.com","username":"reader","level":3,
                "exp":40,"exp_for_next_level":200,"coins":15,"created_at":"2024-03-01T10:00:00Z"}"#,
        )
        .unwrap_or_else(|e| panic!("decode failed: {e}"));
        let full = AuthResponse {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_in: Some(3600),
            user: Some(user),
        };
        assert_eq!(round_trip(&full), full);
        let minimal = AuthResponse { expires_in: None, user: None, ..full };
        assert_eq!(round_trip(&minimal), minimal);

        let registration = RegisterRequest {
            display_name: Some("Reader".to_string()),
            ..valid_registration()
        };
        assert_eq!(round_trip(&registration), registration);
        assert_eq!(round_trip(&valid_registration()), valid_registration());
    }
}
