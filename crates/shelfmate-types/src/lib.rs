//! # Shelfmate Types
//!
//! Data-transfer records and failure definitions shared by the Shelfmate
//! client SDK and CLI.
//!
//! - **`error`** - Tagged failures per domain (auth, network, validation, storage)
//! - **`models`** - Wire records (User, Book, ReadingSession, Quote, Review, ...)
//!
//! ## Architecture Role
//!
//! ```text
//!             shelfmate-types (this crate)
//!                     │
//!                     ▼
//!             shelfmate-client
//!                     │
//!                     ▼
//!               shelfmate-cli
//! ```
//!
//! Records serialize with serde using `snake_case` keys, derive `Clone` for
//! cheap sharing across async boundaries and `PartialEq` for testing.

pub mod error;
pub mod models;

pub use error::{AuthFailure, Failure, NetworkFailure, Result, StorageFailure, ValidationFailure};

pub use models::{
    AuthResponse, Book, FeedContent, FeedItem, LibraryEntry, Page, Quote, ReadingSession,
    ReadingSessionStatus, ReadingStatus, Review, Settings, ShopItem, Subscription, TokenPair,
    User, UserSummary,
};
