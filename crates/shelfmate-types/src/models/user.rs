//! User profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signed-in user's profile, returned by `/me` and the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Server identifier
    pub id: String,
    /// Account email
    pub email: String,
    /// Public handle
    pub username: String,
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Short profile text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Current level (starts at 1)
    #[serde(default = "default_level")]
    pub level: u32,
    /// Experience collected within the current level
    #[serde(default)]
    pub exp: u32,
    /// Experience required to reach the next level
    #[serde(default)]
    pub exp_for_next_level: u32,
    /// In-app currency balance
    #[serde(default)]
    pub coins: u32,
    /// Consecutive days with at least one finished session
    #[serde(default)]
    pub streak_days: u32,
    /// Number of finished books
    #[serde(default)]
    pub books_read: u32,
    /// Account creation time
    pub created_at: DateTime<Utc>,
}

const fn default_level() -> u32 {
    1
}

impl User {
    /// Fraction of the current level completed, in `[0, 1]`.
    pub fn level_progress(&self) -> f64 {
        if self.exp_for_next_level == 0 {
            return 0.0;
        }
        (f64::from(self.exp) / f64::from(self.exp_for_next_level)).clamp(0.0, 1.0)
    }

    /// Experience still missing for the next level.
    pub const fn exp_to_next_level(&self) -> u32 {
        self.exp_for_next_level.saturating_sub(self.exp)
    }

    /// Name to show in lists: display name when set, username otherwise.
    pub fn display_label(&self) -> &str {
        self.display_name.as_deref().filter(|n| !n.trim().is_empty()).unwrap_or(&self.username)
    }

    /// Compact form embedded in feed items and reviews.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            avatar_url: self.avatar_url.clone(),
            level: self.level,
        }
    }
}

/// Compact user reference embedded in other records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    /// Server identifier
    pub id: String,
    /// Public handle
    pub username: String,
    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Current level
    #[serde(default = "default_level")]
    pub level: u32,
}

/// Aggregated reading statistics from `/me/stats`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct UserStats {
    pub pages_read: u64,
    pub minutes_read: u64,
    pub books_finished: u32,
    pub quotes_saved: u32,
    pub reviews_written: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl UserStats {
    /// Average reading speed over all sessions, if any time was logged.
    pub fn pages_per_hour(&self) -> Option<f64> {
        if self.minutes_read == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss, reason = "page and minute counts stay far below 2^52")]
        Some(self.pages_read as f64 * 60.0 / self.minutes_read as f64)
    }
}

/// Body for `PATCH /me`. Only present fields are changed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, Validate)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 64, message = "must be at most 64 characters"))]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "must be a valid URL"))]
    pub avatar_url: Option<String>,
}
