//! In-app shop models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Kind of item sold for coins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShopCategory {
    Theme,
    AvatarFrame,
    Badge,
    Booster,
    #[serde(other)]
    Other,
}

/// An item from `/shop/items`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: ShopCategory,
    pub price_coins: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Already bought by the signed-in user
    #[serde(default)]
    pub owned: bool,
}

impl ShopItem {
    /// Whether `user` can buy this item right now.
    pub const fn affordable_by(&self, user: &User) -> bool {
        !self.owned && user.coins >= self.price_coins
    }
}

/// Result of `POST /shop/items/{id}/purchase`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Purchase {
    pub item_id: String,
    pub coins_spent: u32,
    pub remaining_coins: u32,
    pub purchased_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::round_trip;

    #[test]
    fn test_unknown_category_decodes_as_other() {
        let item: ShopItem = serde_json::from_str(
            r#"{"id":"i1","name":"Sticker","category":"sticker","price_coins":5}"#,
        )
        .unwrap_or_else(|e| panic!("decode failed: {e}"));
        assert_eq!(item.category, ShopCategory::Other);
        assert!(!item.owned);
    }

    #[test]
    fn test_round_trip() {
        let full = ShopItem {
            id: "i1".to_string(),
            name: "Night owl theme".to_string(),
            description: Some("Dark reading theme".to_string()),
            category: ShopCategory::AvatarFrame,
            price_coins: 250,
            image_url: Some("https://cdn.example.com/owl.png".to_string()),
            owned: true,
        };
        assert_eq!(round_trip(&full), full);
        let minimal = ShopItem {
            description: None,
            category: ShopCategory::Badge,
            image_url: None,
            owned: false,
            ..full
        };
        assert_eq!(round_trip(&minimal), minimal);

        let purchase = Purchase {
            item_id: "i1".to_string(),
            coins_spent: 250,
            remaining_coins: 0,
            purchased_at: "2024-05-01T08:00:00Z"
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|e| panic!("bad timestamp: {e}")),
        };
        assert_eq!(round_trip(&purchase), purchase);
    }
}
