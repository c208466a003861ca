//! Saved quotes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A passage the user saved from a book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    pub id: String,
    pub book_id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Private annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub likes_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /quotes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct NewQuote {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub book_id: String,
    #[validate(
        length(min = 1, max = 2000, message = "must be between 1 and 2000 characters"),
        custom(function = "not_blank")
    )]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub note: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
