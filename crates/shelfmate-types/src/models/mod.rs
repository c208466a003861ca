//! Wire records exchanged with the Shelfmate backend.
//!
//! Most records are flat or shallowly nested. Behavior is limited to derived
//! read-only properties such as progress percentages and level thresholds.

mod auth;
mod book;
mod bookstore;
mod feed;
mod page;
mod quote;
mod review;
mod session;
mod settings;
mod shop;
mod subscription;
mod token;
mod user;

pub use auth::{
    AuthResponse, LoginRequest, LogoutRequest, OAuthProvider, OAuthRequest, RefreshRequest,
    RegisterRequest,
};
pub use book::{Book, LibraryEntry, LibraryEntryUpdate, ReadingStatus};
pub use bookstore::Bookstore;
pub use feed::{FeedContent, FeedItem};
pub use page::Page;
pub use quote::{NewQuote, Quote};
pub use review::{NewReview, Review};
pub use session::{NewReadingSession, ReadingSession, ReadingSessionStatus, ReadingSessionUpdate};
pub use settings::Settings;
pub use shop::{Purchase, ShopCategory, ShopItem};
pub use subscription::{BillingInterval, Subscription, SubscriptionPlan, SubscriptionStatus};
pub use token::TokenPair;
pub use user::{ProfileUpdate, User, UserStats, UserSummary};
