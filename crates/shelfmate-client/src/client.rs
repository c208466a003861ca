use shelfmate_types::{Failure, Settings};
use std::path::Path;
use std::sync::Arc;

use crate::api::{
    BooksApi, BookstoresApi, FeedApi, ProfileApi, QuotesApi, ReviewsApi, SessionsApi, ShopApi,
    SubscriptionsApi,
};
use crate::auth::AuthRepository;
use crate::config::ClientConfig;
use crate::http::ApiClient;
use crate::paths::{CREDENTIALS_FILE, STORE_FILE};
use crate::session::ReadingSessionTracker;
use crate::storage::{FileTokenStore, KeyValueStore, TokenStore};

/// Entry point bundling the transport, local stores and every repository.
///
/// Repository handles are cheap to create; they share one [`ApiClient`] and
/// one [`KeyValueStore`].
#[derive(Clone)]
pub struct Shelfmate {
    client: Arc<ApiClient>,
    store: Arc<KeyValueStore>,
}

impl Shelfmate {
    /// Open with credentials and the key-value store under `data_dir`.
    pub async fn open(config: ClientConfig, data_dir: &Path) -> Result<Self, Failure> {
        let tokens: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::new(data_dir.join(CREDENTIALS_FILE)));
        let store = Arc::new(KeyValueStore::open(data_dir.join(STORE_FILE)).await?);
        Self::with_stores(config, tokens, store)
    }

    pub fn with_stores(
        config: ClientConfig,
        tokens: Arc<dyn TokenStore>,
        store: Arc<KeyValueStore>,
    ) -> Result<Self, Failure> {
        tracing::debug!("Using Shelfmate API at {}", config.base_url);
        let client = Arc::new(ApiClient::new(config, tokens)?);
        Ok(Self { client, store })
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn store(&self) -> &Arc<KeyValueStore> {
        &self.store
    }

    pub fn auth(&self) -> AuthRepository {
        AuthRepository::new(Arc::clone(&self.client))
    }

    pub fn profile(&self) -> ProfileApi {
        ProfileApi::new(Arc::clone(&self.client))
    }

    pub fn books(&self) -> BooksApi {
        BooksApi::new(Arc::clone(&self.client), Arc::clone(&self.store))
    }

    pub fn bookstores(&self) -> BookstoresApi {
        BookstoresApi::new(Arc::clone(&self.client), Arc::clone(&self.store))
    }

    pub fn sessions(&self) -> SessionsApi {
        SessionsApi::new(Arc::clone(&self.client))
    }

    pub fn quotes(&self) -> QuotesApi {
        QuotesApi::new(Arc::clone(&self.client))
    }

    pub fn reviews(&self) -> ReviewsApi {
        ReviewsApi::new(Arc::clone(&self.client))
    }

    pub fn feed(&self) -> FeedApi {
        FeedApi::new(Arc::clone(&self.client))
    }

    pub fn shop(&self) -> ShopApi {
        ShopApi::new(Arc::clone(&self.client))
    }

    pub fn subscriptions(&self) -> SubscriptionsApi {
        SubscriptionsApi::new(Arc::clone(&self.client), Arc::clone(&self.store))
    }

    /// Tracker restored from the key-value store.
    pub async fn session_tracker(&self) -> Result<ReadingSessionTracker, Failure> {
        ReadingSessionTracker::load(Arc::clone(&self.store)).await
    }

    pub async fn settings(&self) -> Result<Settings, Failure> {
        Ok(self.store.settings().await?)
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<(), Failure> {
        Ok(self.store.save_settings(settings).await?)
    }

    /// Sign out and purge expired cache entries. Settings and unsynced
    /// sessions are kept.
    pub async fn sign_out(&self) -> Result<(), Failure> {
        self.auth().logout().await?;
        let removed = self.store.purge_expired().await?;
        tracing::debug!("Dropped {} expired cache entries on sign-out", removed);
        Ok(())
    }
}
