//! HTTP transport: bearer auth, status mapping, refresh-on-expiry and
//! retries of idempotent reads.

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shelfmate_types::models::{AuthResponse, RefreshRequest};
use shelfmate_types::TokenPair;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::config::ClientConfig;
use crate::endpoints;
use crate::error::{ApiErrorBody, ClientError};
use crate::storage::TokenStore;

/// A request that can be sent more than once (retry, replay after refresh).
struct ApiRequest<'a> {
    method: Method,
    path: &'a str,
    query: &'a [(&'a str, String)],
    body: Option<serde_json::Value>,
}

pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenStore>,
    /// Serializes token refreshes so concurrent 401s rotate the pair once.
    refresh_lock: Mutex<()>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("shelfmate-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config, tokens, refresh_lock: Mutex::new(()) })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Authorized GET, retried on 429 and 5xx.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let request = ApiRequest { method: Method::GET, path, query, body: None };
        let resp = self.send_with_retry(&request).await?;
        decode(resp).await
    }

    /// Authorized POST.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = ApiRequest { method: Method::POST, path, query: &[], body: Some(to_json(body)?) };
        let resp = self.send_authorized(&request).await?;
        decode(resp).await
    }

    /// Authorized POST whose response body is ignored.
    pub async fn post_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ClientError> {
        let request = ApiRequest { method: Method::POST, path, query: &[], body: Some(to_json(body)?) };
        let _ = self.send_authorized(&request).await?;
        Ok(())
    }

    /// Authorized PATCH.
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = ApiRequest { method: Method::PATCH, path, query: &[], body: Some(to_json(body)?) };
        let resp = self.send_authorized(&request).await?;
        decode(resp).await
    }

    /// Authorized PATCH whose response body is ignored.
    pub async fn patch_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ClientError> {
        let request = ApiRequest { method: Method::PATCH, path, query: &[], body: Some(to_json(body)?) };
        let _ = self.send_authorized(&request).await?;
        Ok(())
    }

    /// Authorized DELETE.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let request = ApiRequest { method: Method::DELETE, path, query: &[], body: None };
        let _ = self.send_authorized(&request).await?;
        Ok(())
    }

    /// Unauthenticated POST, used by the sign-in endpoints.
    pub async fn post_public<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = ApiRequest { method: Method::POST, path, query: &[], body: Some(to_json(body)?) };
        let resp = self.send_once(&request, None).await?;
        decode(resp).await
    }

    /// Exchange the stored refresh token for a new pair.
    pub async fn refresh_tokens(&self) -> Result<TokenPair, ClientError> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Current access token, refreshed first when it is about to expire.
    async fn valid_token(&self) -> Result<TokenPair, ClientError> {
        let tokens = self.tokens.load().await?.ok_or(ClientError::NotSignedIn)?;
        if !tokens.expires_within(self.config.refresh_skew_secs) {
            return Ok(tokens);
        }

        let _guard = self.refresh_lock.lock().await;
        // Another task may have refreshed while we waited for the lock.
        match self.tokens.load().await? {
            Some(current) if !current.expires_within(self.config.refresh_skew_secs) => Ok(current),
            _ => {
                tracing::debug!("Access token expires soon, refreshing before request");
                self.refresh_locked().await
            },
        }
    }

    /// Refresh after the server rejected `rejected`. Skips the network call
    /// when another task already rotated the pair.
    async fn refresh_after_rejection(&self, rejected: &TokenPair) -> Result<TokenPair, ClientError> {
        let _guard = self.refresh_lock.lock().await;
        match self.tokens.load().await? {
            Some(current) if current.access_token != rejected.access_token => Ok(current),
            Some(_) => self.refresh_locked().await,
            None => Err(ClientError::SessionExpired),
        }
    }

    /// Caller must hold `refresh_lock`.
    async fn refresh_locked(&self) -> Result<TokenPair, ClientError> {
        let Some(current) = self.tokens.load().await? else {
            return Err(ClientError::SessionExpired);
        };

        let body = RefreshRequest { refresh_token: current.refresh_token };
        let request = ApiRequest {
            method: Method::POST,
            path: endpoints::AUTH_REFRESH,
            query: &[],
            body: Some(to_json(&body)?),
        };

        match self.send_once(&request, None).await {
            Ok(resp) => {
                let auth: AuthResponse = decode(resp).await?;
                let tokens = auth.tokens();
                self.tokens.save(&tokens).await?;
                tracing::info!("Access token refreshed");
                Ok(tokens)
            },
            Err(
                ClientError::Unauthorized
                | ClientError::Rejected { .. }
                | ClientError::NotFound { .. },
            ) => {
                tracing::warn!("Refresh token rejected, clearing stored credentials");
                self.tokens.clear().await?;
                Err(ClientError::SessionExpired)
            },
            Err(e) => Err(e),
        }
    }

    /// Send with the stored token; on 401 refresh once and replay once.
    async fn send_authorized(&self, request: &ApiRequest<'_>) -> Result<Response, ClientError> {
        let tokens = self.valid_token().await?;
        match self.send_once(request, Some(&tokens)).await {
            Err(ClientError::Unauthorized) => {
                tracing::debug!("{} {} returned 401, refreshing", request.method, request.path);
                let refreshed = self.refresh_after_rejection(&tokens).await?;
                self.send_once(request, Some(&refreshed)).await
            },
            other => other,
        }
    }

    async fn send_with_retry(&self, request: &ApiRequest<'_>) -> Result<Response, ClientError> {
        let retry = self.config.retry;
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self.send_authorized(request).await {
                Err(e) if e.is_retryable() && attempts <= retry.max_retries => {
                    let delay_ms = match &e {
                        ClientError::RateLimited { retry_after: Some(secs) } => {
                            secs.saturating_mul(1000).min(retry.max_delay_ms)
                        },
                        _ => retry.delay_for(attempts),
                    };
                    tracing::debug!(
                        "{} {} failed ({}), retrying in {}ms (attempt {})",
                        request.method,
                        request.path,
                        e,
                        delay_ms,
                        attempts
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                },
                other => return other,
            }
        }
    }

    async fn send_once(
        &self,
        request: &ApiRequest<'_>,
        tokens: Option<&TokenPair>,
    ) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.config.base_url, request.path);
        let mut builder = self.client.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(request.query);
        }
        if let Some(tokens) = tokens {
            builder = builder.header(reqwest::header::AUTHORIZATION, tokens.authorization());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        check_status(resp, request.path).await
    }
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, ClientError> {
    serde_json::to_value(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let bytes = resp.bytes().await?;
    // Empty bodies decode as JSON null so `()` and `Option<_>` targets work on 204s.
    let bytes: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
    serde_json::from_slice(bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

/// Map non-2xx statuses to typed errors.
async fn check_status(resp: Response, path: &str) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok());
        return Err(ClientError::RateLimited { retry_after });
    }

    let text = resp.text().await.unwrap_or_default();
    let body = ApiErrorBody::parse(&text);

    Err(match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::NOT_FOUND => ClientError::NotFound { path: path.to_string() },
        StatusCode::CONFLICT => {
            ClientError::Conflict { message: body.message_or("conflict"), code: body.code }
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ClientError::Rejected {
            field: body.field.clone().unwrap_or_else(|| "request".to_string()),
            message: body.message_or("is invalid"),
            code: body.code,
        },
        _ => ClientError::ServerError {
            status: status.as_u16(),
            message: body.message_or(status.canonical_reason().unwrap_or("unexpected status")),
            code: body.code,
        },
    })
}
