//! Book and shelf models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalogue entry from `/books`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f32>,
    #[serde(default)]
    pub ratings_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
}

impl Book {
    /// First listed author.
    pub fn primary_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// All authors joined for display.
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }
}

/// Where a book sits on the user's shelf.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    #[default]
    WantToRead,
    Reading,
    Finished,
    Abandoned,
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::WantToRead => write!(f, "want_to_read"),
            Self::Reading => write!(f, "reading"),
            Self::Finished => write!(f, "finished"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}

impl ReadingStatus {
    /// Parse from string.
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "want_to_read" => Some(Self::WantToRead),
            "reading" => Some(Self::Reading),
            "finished" => Some(Self::Finished),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }
}

/// A book on the user's shelf, from `/me/library`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryEntry {
    pub book: Book,
    #[serde(default)]
    pub status: ReadingStatus,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// User's own rating, 1..=5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl LibraryEntry {
    /// Reading progress in percent, clamped to `[0, 100]`.
    ///
    /// Finished books are always 100; books with unknown length are 0.
    pub fn progress_percent(&self) -> f64 {
        if self.status == ReadingStatus::Finished {
            return 100.0;
        }
        match self.book.page_count {
            Some(total) if total > 0 => {
                (f64::from(self.current_page) / f64::from(total) * 100.0).clamp(0.0, 100.0)
            },
            _ => 0.0,
        }
    }

    /// Pages left, if the page count is known.
    pub fn pages_remaining(&self) -> Option<u32> {
        self.book.page_count.map(|total| total.saturating_sub(self.current_page))
    }
}

/// Body for `PATCH /me/library/{book_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LibraryEntryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReadingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::models::test_support::round_trip;

    fn book(page_count: Option<u32>) -> Book {
        Book {
            id: "b1".to_string(),
            title: "The Left Hand of Darkness".to_string(),
            authors: vec!["Ursula K. Le Guin".to_string()],
            isbn: None,
            cover_url: None,
            description: None,
            page_count,
            categories: Vec::new(),
            average_rating: None,
            ratings_count: 0,
            published_year: Some(1969),
        }
    }

    fn entry(page_count: Option<u32>, current_page: u32, status: ReadingStatus) -> LibraryEntry {
        LibraryEntry {
            book: book(page_count),
            status,
            current_page,
            started_at: None,
            finished_at: None,
            rating: None,
        }
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(entry(Some(200), 50, ReadingStatus::Reading).progress_percent(), 25.0);
        assert_eq!(entry(Some(200), 0, ReadingStatus::Reading).progress_percent(), 0.0);
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(entry(Some(200), 450, ReadingStatus::Reading).progress_percent(), 100.0);
        assert_eq!(entry(Some(0), 10, ReadingStatus::Reading).progress_percent(), 0.0);
        assert_eq!(entry(None, 10, ReadingStatus::Reading).progress_percent(), 0.0);
    }

    #[test]
    fn test_finished_is_complete() {
        assert_eq!(entry(None, 0, ReadingStatus::Finished).progress_percent(), 100.0);
        assert_eq!(entry(Some(300), 120, ReadingStatus::Finished).progress_percent(), 100.0);
    }

    #[test]
    fn test_pages_remaining() {
        assert_eq!(entry(Some(300), 120, ReadingStatus::Reading).pages_remaining(), Some(180));
        assert_eq!(entry(Some(300), 320, ReadingStatus::Reading).pages_remaining(), Some(0));
        assert_eq!(entry(None, 5, ReadingStatus::Reading).pages_remaining(), None);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ReadingStatus::WantToRead).unwrap_or_default(),
            "\"want_to_read\""
        );
        assert_eq!(ReadingStatus::from_string("abandoned"), Some(ReadingStatus::Abandoned));
        assert_eq!(ReadingStatus::from_string("lost"), None);
    }

    #[test]
    fn test_author_line() {
        let mut b = book(None);
        b.authors.push("Another Author".to_string());
        assert_eq!(b.primary_author(), Some("Ursula K. Le Guin"));
        assert_eq!(b.author_line(), "Ursula K. Le Guin, Another Author");
    }

    #[test]
    fn test_round_trip() {
        let started = "2024-04-02T19:30:00Z"
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|e| panic!("bad timestamp: {e}"));
        let full = LibraryEntry {
            book: Book {
                isbn: Some("9780441478125".to_string()),
                cover_url: Some("https://covers.example.com/b1.jpg".to_string()),
                description: Some("Genly Ai arrives on Gethen.".to_string()),
                categories: vec!["science fiction".to_string()],
                average_rating: Some(4.25),
                ratings_count: 312,
                ..book(Some(304))
            },
            status: ReadingStatus::Finished,
            current_page: 304,
            started_at: Some(started),
            finished_at: Some(started + chrono::Duration::days(12)),
            rating: Some(5),
        };
        assert_eq!(round_trip(&full), full);

        let minimal = LibraryEntry {
            book: Book { authors: Vec::new(), published_year: None, ..book(None) },
            ..entry(None, 0, ReadingStatus::WantToRead)
        };
        assert_eq!(round_trip(&minimal), minimal);
    }
}
