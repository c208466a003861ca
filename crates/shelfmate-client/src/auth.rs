//! Sign-in, registration, token refresh and sign-out.

use shelfmate_types::models::{
    AuthResponse, LoginRequest, LogoutRequest, OAuthProvider, OAuthRequest, RegisterRequest,
};
use shelfmate_types::{AuthFailure, Failure, TokenPair, User};
use std::sync::Arc;
use validator::Validate;

use crate::endpoints;
use crate::error::ClientError;
use crate::http::ApiClient;

/// Authentication flows on top of [`ApiClient`]. Successful sign-ins persist
/// the token pair in the client's [`crate::TokenStore`].
#[derive(Clone)]
pub struct AuthRepository {
    client: Arc<ApiClient>,
}

impl AuthRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, Failure> {
        let body = LoginRequest { email: email.trim().to_string(), password: password.to_string() };
        let result: Result<AuthResponse, ClientError> =
            self.client.post_public(endpoints::AUTH_LOGIN, &body).await;

        // Only 401 means wrong credentials; a 422 keeps its field error.
        let auth = result.map_err(|e| match e {
            ClientError::Unauthorized => Failure::from(AuthFailure::InvalidCredentials),
            other => other.into(),
        })?;
        self.complete_sign_in(auth, "password").await
    }

    /// Validates locally before calling the server.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, Failure> {
        request.validate()?;

        let result: Result<AuthResponse, ClientError> =
            self.client.post_public(endpoints::AUTH_REGISTER, &request).await;
        let auth = result.map_err(|e| match e {
            ClientError::Conflict { .. } => Failure::from(AuthFailure::EmailAlreadyInUse),
            other => other.into(),
        })?;
        self.complete_sign_in(auth, "registration").await
    }

    /// Exchange a provider identity token for a session. An empty token
    /// means the user dismissed the provider's sign-in sheet.
    pub async fn login_with_oauth(
        &self,
        provider: OAuthProvider,
        id_token: &str,
    ) -> Result<User, Failure> {
        if id_token.trim().is_empty() {
            return Err(AuthFailure::OAuthCancelled { provider: provider.to_string() }.into());
        }

        let body = OAuthRequest { id_token: id_token.to_string() };
        let result: Result<AuthResponse, ClientError> =
            self.client.post_public(&endpoints::auth_oauth(provider), &body).await;
        let auth = result.map_err(|e| match e {
            ClientError::Unauthorized => Failure::from(AuthFailure::InvalidCredentials),
            other => other.into(),
        })?;
        self.complete_sign_in(auth, provider.as_str()).await
    }

    /// Force a token refresh. Clears tokens and returns `SessionExpired`
    /// when the refresh token is missing or rejected.
    pub async fn refresh(&self) -> Result<TokenPair, Failure> {
        Ok(self.client.refresh_tokens().await?)
    }

    /// Revoke the refresh token server-side (best effort) and forget local
    /// credentials regardless of the outcome.
    pub async fn logout(&self) -> Result<(), Failure> {
        let tokens = self.client.tokens().load().await?;
        if let Some(tokens) = tokens {
            let body = LogoutRequest { refresh_token: tokens.refresh_token };
            if let Err(e) = self.client.post_empty(endpoints::AUTH_LOGOUT, &body).await {
                tracing::warn!("Logout request failed, clearing local session anyway: {}", e);
            }
        }
        self.client.tokens().clear().await?;
        tracing::info!("Signed out");
        Ok(())
    }

    pub async fn current_user(&self) -> Result<User, Failure> {
        Ok(self.client.get(endpoints::ME, &[]).await?)
    }

    /// Whether a token pair is stored. Does not contact the server.
    pub async fn is_signed_in(&self) -> Result<bool, Failure> {
        Ok(self.client.tokens().load().await?.is_some())
    }

    async fn complete_sign_in(&self, auth: AuthResponse, method: &str) -> Result<User, Failure> {
        self.client.tokens().save(&auth.tokens()).await?;

        let user = match auth.user {
            Some(user) => user,
            None => self.current_user().await?,
        };
        tracing::info!("Signed in as {} via {}", user.username, method);
        Ok(user)
    }
}
