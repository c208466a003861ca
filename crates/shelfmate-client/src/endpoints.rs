//! REST paths consumed by the client, relative to `ClientConfig::base_url`.

use shelfmate_types::models::OAuthProvider;

pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_REGISTER: &str = "/auth/register";
pub const AUTH_REFRESH: &str = "/auth/refresh";
pub const AUTH_LOGOUT: &str = "/auth/logout";

pub const ME: &str = "/me";
pub const ME_STATS: &str = "/me/stats";
pub const ME_LIBRARY: &str = "/me/library";

pub const BOOKS: &str = "/books";
pub const READING_SESSIONS: &str = "/reading-sessions";
pub const QUOTES: &str = "/quotes";
pub const REVIEWS: &str = "/reviews";
pub const FEED: &str = "/feed";
pub const BOOKSTORES: &str = "/bookstores";

pub const SHOP_ITEMS: &str = "/shop/items";

pub const SUBSCRIPTION_PLANS: &str = "/subscriptions/plans";
pub const SUBSCRIPTION_CURRENT: &str = "/subscriptions/current";
pub const SUBSCRIPTION_CANCEL: &str = "/subscriptions/cancel";

/// `/auth/oauth/{provider}`
pub fn auth_oauth(provider: OAuthProvider) -> String {
    format!("/auth/oauth/{}", provider.as_str())
}

/// `/me/library/{book_id}`
pub fn library_entry(book_id: &str) -> String {
    format!("{ME_LIBRARY}/{}", encode_segment(book_id))
}

/// `/books/{id}`
pub fn book(id: &str) -> String {
    format!("{BOOKS}/{}", encode_segment(id))
}

/// `/reading-sessions/{id}`
pub fn reading_session(id: &uuid::Uuid) -> String {
    format!("{READING_SESSIONS}/{id}")
}

/// `/quotes/{id}`
pub fn quote(id: &str) -> String {
    format!("{QUOTES}/{}", encode_segment(id))
}

/// `/shop/items/{id}/purchase`
pub fn shop_purchase(item_id: &str) -> String {
    format!("{SHOP_ITEMS}/{}/purchase", encode_segment(item_id))
}

/// Percent-encode a single path segment.
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect::<String>().replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameterized_paths() {
        assert_eq!(auth_oauth(OAuthProvider::Apple), "/auth/oauth/apple");
        assert_eq!(book("b-1"), "/books/b-1");
        assert_eq!(shop_purchase("frame_gold"), "/shop/items/frame_gold/purchase");
        assert_eq!(library_entry("b1"), "/me/library/b1");
    }

    #[test]
    fn test_segments_are_encoded() {
        assert_eq!(book("a/b"), "/books/a%2Fb");
        assert_eq!(quote("x y"), "/quotes/x%20y");
    }
}
