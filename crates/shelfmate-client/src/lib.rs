#![doc = include_str!("../README.md")]

mod api;
mod auth;
mod client;
mod config;
pub mod endpoints;
mod error;
mod http;
pub mod paths;
mod session;
mod storage;

pub use api::{
    BooksApi, BookstoresApi, FeedApi, NearbyBookstore, ProfileApi, QuotesApi, ReviewsApi,
    SessionsApi, ShopApi, SubscriptionsApi,
};
pub use auth::AuthRepository;
pub use client::Shelfmate;
pub use config::{ClientConfig, RetryConfig};
pub use error::ClientError;
pub use http::ApiClient;
pub use session::{PendingOperation, ReadingSessionTracker, SessionSink, SyncReport, TrackerState};
pub use storage::{FileTokenStore, KeyValueStore, MemoryTokenStore, TokenStore};
