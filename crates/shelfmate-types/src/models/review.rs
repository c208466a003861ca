//! Book reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::UserSummary;

/// A user's review of a book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub id: String,
    pub book_id: String,
    pub author: UserSummary,
    /// Star rating, 1..=5
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub contains_spoilers: bool,
    #[serde(default)]
    pub likes_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /reviews`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct NewReview {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub book_id: String,
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub text: Option<String>,
    #[serde(default)]
    pub contains_spoilers: bool,
}
