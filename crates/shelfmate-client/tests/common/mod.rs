#![allow(dead_code, reason = "shared by several integration test binaries")]

use shelfmate_client::{ClientConfig, KeyValueStore, MemoryTokenStore, RetryConfig, Shelfmate};
use shelfmate_types::TokenPair;
use std::sync::Arc;
use wiremock::MockServer;

pub struct Harness {
    pub server: MockServer,
    pub tokens: Arc<MemoryTokenStore>,
    pub app: Shelfmate,
}

pub fn user_json(username: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "u1",
        "email": format!("{username}@example.com"),
        "username": username,
        "level": 4,
        "exp": 120,
        "exp_for_next_level": 400,
        "coins": 50,
        "created_at": "2024-01-15T09:30:00Z"
    })
}

pub fn auth_json(access: &str, refresh: &str, with_user: bool) -> serde_json::Value {
    let mut body = serde_json::json!({
        "access_token": access,
        "refresh_token": refresh,
        "expires_in": 900
    });
    if with_user {
        body["user"] = user_json("reader");
    }
    body
}

pub fn tokens(access: &str, refresh: &str) -> TokenPair {
    TokenPair::new(access.to_string(), refresh.to_string(), Some(900))
}

pub async fn harness(initial: Option<TokenPair>) -> Harness {
    let server = MockServer::start().await;
    let config = ClientConfig {
        retry: RetryConfig { max_retries: 2, base_delay_ms: 1, max_delay_ms: 5 },
        ..ClientConfig::with_base_url(server.uri())
    };
    let tokens = Arc::new(match initial {
        Some(pair) => MemoryTokenStore::with_tokens(pair),
        None => MemoryTokenStore::new(),
    });
    let app = Shelfmate::with_stores(config, tokens.clone(), Arc::new(KeyValueStore::in_memory()))
        .expect("client should build");
    Harness { server, tokens, app }
}
