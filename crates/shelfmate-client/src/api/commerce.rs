//! Coin shop and premium subscriptions.

use shelfmate_types::models::{Purchase, SubscriptionPlan};
use shelfmate_types::{Failure, ShopItem, Subscription, User, ValidationFailure};
use std::sync::Arc;

use super::cached;
use crate::endpoints;
use crate::http::ApiClient;
use crate::storage::KeyValueStore;

const PLANS_CACHE_KEY: &str = "subscriptions:plans";

#[derive(Clone)]
pub struct ShopApi {
    client: Arc<ApiClient>,
}

impl ShopApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn items(&self) -> Result<Vec<ShopItem>, Failure> {
        Ok(self.client.get(endpoints::SHOP_ITEMS, &[]).await?)
    }

    /// Buy `item` for `buyer`. Owned or unaffordable items are rejected
    /// before any request is made.
    pub async fn purchase(&self, item: &ShopItem, buyer: &User) -> Result<Purchase, Failure> {
        if item.owned {
            return Err(ValidationFailure::Conflict {
                message: format!("'{}' is already owned", item.name),
                code: None,
            }
            .into());
        }
        if !item.affordable_by(buyer) {
            return Err(ValidationFailure::field(
                "coins",
                format!("{} coins needed, {} available", item.price_coins, buyer.coins),
            )
            .into());
        }

        let purchase: Purchase = self
            .client
            .post(&endpoints::shop_purchase(&item.id), &serde_json::json!({}))
            .await
            .map_err(|e| e.into_failure_for("shop item", &item.id))?;
        tracing::info!(
            "Purchased {} for {} coins ({} left)",
            item.id,
            purchase.coins_spent,
            purchase.remaining_coins
        );
        Ok(purchase)
    }
}

#[derive(Clone)]
pub struct SubscriptionsApi {
    client: Arc<ApiClient>,
    cache: Arc<KeyValueStore>,
}

impl SubscriptionsApi {
    pub fn new(client: Arc<ApiClient>, cache: Arc<KeyValueStore>) -> Self {
        Self { client, cache }
    }

    pub async fn plans(&self) -> Result<Vec<SubscriptionPlan>, Failure> {
        let client = &self.client;
        let ttl = client.config().cache_ttl_secs;
        cached(&self.cache, PLANS_CACHE_KEY, ttl, || async move {
            Ok(client.get(endpoints::SUBSCRIPTION_PLANS, &[]).await?)
        })
        .await
    }

    /// `None` for users who never subscribed.
    pub async fn current(&self) -> Result<Option<Subscription>, Failure> {
        match self.client.get(endpoints::SUBSCRIPTION_CURRENT, &[]).await {
            Ok(subscription) => Ok(subscription),
            Err(crate::ClientError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Cancel at the end of the current period.
    pub async fn cancel(&self) -> Result<Subscription, Failure> {
        Ok(self.client.post(endpoints::SUBSCRIPTION_CANCEL, &serde_json::json!({})).await?)
    }
}
