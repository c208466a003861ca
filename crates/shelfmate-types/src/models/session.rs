//! Reading session models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle state of a reading session as stored by the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReadingSessionStatus {
    /// Timer running
    Active,
    /// Timer stopped, session can be resumed
    Paused,
    /// Session closed with an end page
    Finished,
}

impl fmt::Display for ReadingSessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Active => write!(f, "active"),
            Self::Paused => write!(f, "paused"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// A timed reading session for one book.
///
/// Identifiers are generated on the device so that a session created offline
/// keeps its identity when it is replayed to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadingSession {
    /// Client-generated identifier
    pub id: Uuid,
    /// Book being read
    pub book_id: String,
    /// Current state
    pub status: ReadingSessionStatus,
    /// When the session was started
    pub started_at: DateTime<Utc>,
    /// When the session was last paused (cleared on resume)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<DateTime<Utc>>,
    /// When the session was finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Page the reader started on
    pub start_page: u32,
    /// Page the reader stopped on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_page: Option<u32>,
    /// Seconds spent with the timer running, excluding pauses
    #[serde(default)]
    pub active_seconds: u64,
    /// Experience awarded by the server once finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_earned: Option<u32>,
}

impl ReadingSession {
    /// New active session starting now-ish at `started_at`.
    pub fn start(book_id: impl Into<String>, start_page: u32, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_id: book_id.into(),
            status: ReadingSessionStatus::Active,
            started_at,
            paused_at: None,
            ended_at: None,
            start_page,
            end_page: None,
            active_seconds: 0,
            exp_earned: None,
        }
    }

    /// Pages covered; 0 until an end page is known.
    pub fn pages_read(&self) -> u32 {
        self.end_page.map_or(0, |end| end.saturating_sub(self.start_page))
    }

    /// Active reading time.
    pub fn duration(&self) -> chrono::Duration {
        let secs = i64::try_from(self.active_seconds).unwrap_or(i64::MAX);
        // chrono caps durations at i64::MAX milliseconds.
        chrono::Duration::seconds(secs.min(i64::MAX / 1_000))
    }

    /// Reading speed, if any time was logged.
    pub fn pages_per_hour(&self) -> Option<f64> {
        if self.active_seconds == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss, reason = "session lengths stay far below 2^52 seconds")]
        Some(f64::from(self.pages_read()) * 3600.0 / self.active_seconds as f64)
    }

    /// Body used to create this session on the server.
    pub fn to_new(&self) -> NewReadingSession {
        NewReadingSession {
            id: self.id,
            book_id: self.book_id.clone(),
            started_at: self.started_at,
            start_page: self.start_page,
        }
    }

    /// Body used to push this session's current state to the server.
    pub fn to_update(&self) -> ReadingSessionUpdate {
        ReadingSessionUpdate {
            status: self.status,
            paused_at: self.paused_at,
            ended_at: self.ended_at,
            end_page: self.end_page,
            active_seconds: self.active_seconds,
        }
    }
}

/// Body for `POST /reading-sessions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewReadingSession {
    pub id: Uuid,
    pub book_id: String,
    pub started_at: DateTime<Utc>,
    pub start_page: u32,
}

/// Body for `PATCH /reading-sessions/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadingSessionUpdate {
    pub status: ReadingSessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_page: Option<u32>,
    pub active_seconds: u64,
}
