//! Token pair model.

use serde::{Deserialize, Serialize};

/// Access/refresh token pair issued by `/auth/login`, `/auth/register`,
/// `/auth/oauth/{provider}` and `/auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    /// Bearer token for authorized calls
    pub access_token: String,
    /// Long-lived token used to obtain a new access token
    pub refresh_token: String,
    /// Absolute unix timestamp when the access token expires, if the server
    /// told us
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// Token type (usually "Bearer")
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenPair {
    /// Create a token pair valid for `expires_in` seconds from now.
    pub fn new(access_token: String, refresh_token: String, expires_in: Option<i64>) -> Self {
        let expires_at = expires_in.map(|s| chrono::Utc::now().timestamp().saturating_add(s));
        Self { access_token, refresh_token, expires_at, token_type: default_token_type() }
    }

    /// Check if the access token is expired. Tokens without an expiry never
    /// expire locally; the server's 401 is authoritative for them.
    pub fn is_expired(&self) -> bool {
        self.expires_within(0)
    }

    /// Check if the access token will expire within the given seconds.
    pub fn expires_within(&self, seconds: i64) -> bool {
        self.expires_at
            .is_some_and(|at| chrono::Utc::now().timestamp().saturating_add(seconds) >= at)
    }

    /// `Authorization` header value.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::round_trip;

    #[test]
    fn test_token_expiry_check() {
        let token = TokenPair::new("access".to_string(), "refresh".to_string(), Some(3600));

        assert!(!token.is_expired());
        assert!(token.expires_within(3601));
        assert!(!token.expires_within(3599));
    }

    #[test]
    fn test_token_without_expiry() {
        let token = TokenPair::new("a".to_string(), "r".to_string(), None);
        assert!(!token.is_expired());
        assert!(!token.expires_within(i64::MAX));
        assert_eq!(token.authorization(), "Bearer a");
    }

    #[test]
    fn test_token_type_defaults_on_decode() {
        let token: TokenPair =
            serde_json::from_str(r#"{"access_token":"a","refresh_token":"r"}"#).unwrap_or_else(
                |e| panic!("decode failed: {e}"),
            );
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_at, None);
    }

    #[test]
    fn test_round_trip() {
        let full = TokenPair {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Some(1_714_550_400),
            token_type: "DPoP".to_string(),
        };
        assert_eq!(round_trip(&full), full);
        let minimal = TokenPair::new("a".to_string(), "r".to_string(), None);
        assert_eq!(round_trip(&minimal), minimal);
    }
}
