//! Social feed items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Book, Quote, Review, UserSummary};

/// One entry in `/feed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedItem {
    pub id: String,
    pub actor: UserSummary,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub content: FeedContent,
}

/// What happened. Kinds this client does not know, and known kinds whose
/// payload does not match, decode as `Unknown` with the raw kind and payload
/// kept, so a new server-side event type never breaks the whole page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawFeedContent", into = "RawFeedContent")]
pub enum FeedContent {
    Quote(Quote),
    Review(Review),
    SessionFinished {
        book: Book,
        pages_read: u32,
        minutes: u32,
    },
    BookFinished {
        book: Book,
    },
    LevelUp {
        level: u32,
    },
    Unknown {
        /// Kind string as sent by the server
        kind: String,
        /// Payload as sent, if any
        payload: Option<Value>,
    },
}

/// `kind` / `payload` pair as it appears on the wire.
#[derive(Serialize, Deserialize)]
struct RawFeedContent {
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

/// Typed decoding of the kinds this client understands.
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
enum KnownContent {
    Quote(Quote),
    Review(Review),
    SessionFinished { book: Book, pages_read: u32, minutes: u32 },
    BookFinished { book: Book },
    LevelUp { level: u32 },
}

impl KnownContent {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Quote(_) => "quote",
            Self::Review(_) => "review",
            Self::SessionFinished { .. } => "session_finished",
            Self::BookFinished { .. } => "book_finished",
            Self::LevelUp { .. } => "level_up",
        }
    }
}

impl From<KnownContent> for FeedContent {
    fn from(known: KnownContent) -> Self {
        match known {
            KnownContent::Quote(q) => Self::Quote(q),
            KnownContent::Review(r) => Self::Review(r),
            KnownContent::SessionFinished { book, pages_read, minutes } => {
                Self::SessionFinished { book, pages_read, minutes }
            },
            KnownContent::BookFinished { book } => Self::BookFinished { book },
            KnownContent::LevelUp { level } => Self::LevelUp { level },
        }
    }
}

impl From<RawFeedContent> for FeedContent {
    fn from(raw: RawFeedContent) -> Self {
        let mut tagged = Map::new();
        tagged.insert("kind".to_string(), Value::String(raw.kind.clone()));
        if let Some(payload) = &raw.payload {
            tagged.insert("payload".to_string(), payload.clone());
        }
        match serde_json::from_value::<KnownContent>(Value::Object(tagged)) {
            Ok(known) => known.into(),
            Err(_) => Self::Unknown { kind: raw.kind, payload: raw.payload },
        }
    }
}

impl From<FeedContent> for RawFeedContent {
    fn from(content: FeedContent) -> Self {
        let known = match content {
            FeedContent::Unknown { kind, payload } => return Self { kind, payload },
            FeedContent::Quote(q) => KnownContent::Quote(q),
            FeedContent::Review(r) => KnownContent::Review(r),
            FeedContent::SessionFinished { book, pages_read, minutes } => {
                KnownContent::SessionFinished { book, pages_read, minutes }
            },
            FeedContent::BookFinished { book } => KnownContent::BookFinished { book },
            FeedContent::LevelUp { level } => KnownContent::LevelUp { level },
        };
        let kind = known.kind().to_string();
        let payload = serde_json::to_value(known)
            .ok()
            .and_then(|mut tagged| tagged.get_mut("payload").map(Value::take));
        Self { kind, payload }
    }
}

impl FeedItem {
    /// One-line description for list rendering.
    pub fn headline(&self) -> String {
        let who = &self.actor.username;
        match &self.content {
            FeedContent::Quote(_) => format!("{who} saved a quote"),
            FeedContent::Review(r) => format!("{who} rated a book {}/5", r.rating),
            FeedContent::SessionFinished { book, pages_read, minutes } => {
                format!("{who} read {pages_read} pages of {} in {minutes} min", book.title)
            },
            FeedContent::BookFinished { book } => format!("{who} finished {}", book.title),
            FeedContent::LevelUp { level } => format!("{who} reached level {level}"),
            FeedContent::Unknown { .. } => format!("{who} did something new"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::test_support::round_trip;
    use crate::models::Page;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        "2024-05-01T08:00:00Z".parse().unwrap()
    }

    fn actor() -> UserSummary {
        UserSummary {
            id: "u1".to_string(),
            username: "ada".to_string(),
            avatar_url: Some("https://cdn.example.com/ada.png".to_string()),
            level: 4,
        }
    }

    fn book() -> Book {
        Book {
            id: "b1".to_string(),
            title: "Dune".to_string(),
            authors: vec!["Frank Herbert".to_string()],
            isbn: None,
            cover_url: None,
            description: None,
            page_count: Some(412),
            categories: vec![],
            average_rating: Some(4.25),
            ratings_count: 8,
            published_year: Some(1965),
        }
    }

    fn item(content: FeedContent) -> FeedItem {
        FeedItem { id: "f1".to_string(), actor: actor(), created_at: at(), content }
    }

    #[test]
    fn test_decode_level_up() {
        let json = r#"{
            "id": "f1",
            "actor": {"id": "u1", "username": "ada", "level": 4},
            "created_at": "2024-05-01T08:00:00Z",
            "kind": "level_up",
            "payload": {"level": 5}
        }"#;
        let item: FeedItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.content, FeedContent::LevelUp { level: 5 });
        assert_eq!(item.headline(), "ada reached level 5");
    }

    #[test]
    fn test_unknown_kind_is_tolerated() {
        let json = r#"{
            "id": "f2",
            "actor": {"id": "u1", "username": "ada"},
            "created_at": "2024-05-01T08:00:00Z",
            "kind": "challenge_joined"
        }"#;
        let item: FeedItem = serde_json::from_str(json).unwrap();
        assert_eq!(
            item.content,
            FeedContent::Unknown { kind: "challenge_joined".to_string(), payload: None }
        );
        assert_eq!(item.actor.level, 1);
        assert_eq!(item.headline(), "ada did something new");
    }

    #[test]
    fn test_unknown_kind_keeps_object_payload() {
        let raw = json!({
            "id": "f3",
            "actor": {"id": "u1", "username": "ada"},
            "created_at": "2024-05-01T08:00:00Z",
            "kind": "challenge_joined",
            "payload": {"challenge": "summer"}
        });
        let item: FeedItem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(
            item.content,
            FeedContent::Unknown {
                kind: "challenge_joined".to_string(),
                payload: Some(json!({"challenge": "summer"})),
            }
        );
        let encoded = serde_json::to_value(&item).unwrap();
        assert_eq!(encoded["kind"], "challenge_joined");
        assert_eq!(encoded["payload"], json!({"challenge": "summer"}));

        let page = json!({
            "items": [
                raw,
                {
                    "id": "f4",
                    "actor": {"id": "u2", "username": "grace"},
                    "created_at": "2024-05-01T09:00:00Z",
                    "kind": "level_up",
                    "payload": {"level": 3}
                }
            ],
            "page": 1,
            "per_page": 20,
            "total": 2
        });
        let page: Page<FeedItem> = serde_json::from_value(page).unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(matches!(
            &page.items[0].content,
            FeedContent::Unknown { kind, payload: Some(_) } if kind == "challenge_joined"
        ));
        assert_eq!(page.items[1].content, FeedContent::LevelUp { level: 3 });
    }

    #[test]
    fn test_known_kind_with_mismatched_payload_falls_back() {
        let json = r#"{
            "id": "f5",
            "actor": {"id": "u1", "username": "ada"},
            "created_at": "2024-05-01T08:00:00Z",
            "kind": "level_up",
            "payload": {"level": "five"}
        }"#;
        let item: FeedItem = serde_json::from_str(json).unwrap();
        assert_eq!(
            item.content,
            FeedContent::Unknown {
                kind: "level_up".to_string(),
                payload: Some(json!({"level": "five"})),
            }
        );
    }

    #[test]
    fn test_round_trip() {
        let quote = Quote {
            id: "q1".to_string(),
            book_id: "b1".to_string(),
            text: "Fear is the mind-killer.".to_string(),
            page: Some(8),
            note: Some("litany".to_string()),
            is_public: true,
            likes_count: 3,
            created_at: at(),
        };
        let review = Review {
            id: "r1".to_string(),
            book_id: "b1".to_string(),
            author: actor(),
            rating: 5,
            text: None,
            contains_spoilers: false,
            likes_count: 0,
            created_at: at(),
        };
        let contents = [
            FeedContent::Quote(quote),
            FeedContent::Review(review),
            FeedContent::SessionFinished { book: book(), pages_read: 42, minutes: 35 },
            FeedContent::BookFinished { book: book() },
            FeedContent::LevelUp { level: 6 },
            FeedContent::Unknown {
                kind: "challenge_joined".to_string(),
                payload: Some(json!({"challenge": "summer", "rank": 2})),
            },
            FeedContent::Unknown { kind: "streak_lost".to_string(), payload: None },
        ];
        for content in contents {
            let original = item(content);
            assert_eq!(round_trip(&original), original);
        }
    }
}
