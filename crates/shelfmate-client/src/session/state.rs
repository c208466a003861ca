//! Pure reading-session transitions.
//!
//! | from            | action  | to     |
//! |-----------------|---------|--------|
//! | Idle            | start   | Active |
//! | Active          | pause   | Paused |
//! | Paused          | resume  | Active |
//! | Active / Paused | finish  | Idle   |
//! | Active / Paused | discard | Idle   |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelfmate_types::{ReadingSession, ReadingSessionStatus, ValidationFailure};
use uuid::Uuid;

/// Tracker state, persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrackerState {
    #[default]
    Idle,
    Active {
        session: ReadingSession,
        /// Start of the current running segment
        resumed_at: DateTime<Utc>,
    },
    Paused {
        session: ReadingSession,
    },
}

impl TrackerState {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active { .. } => "active",
            Self::Paused { .. } => "paused",
        }
    }

    pub const fn session(&self) -> Option<&ReadingSession> {
        match self {
            Self::Idle => None,
            Self::Active { session, .. } | Self::Paused { session } => Some(session),
        }
    }

    /// Active seconds including the running segment, as of `now`.
    pub fn active_seconds_at(&self, now: DateTime<Utc>) -> u64 {
        match self {
            Self::Idle => 0,
            Self::Paused { session } => session.active_seconds,
            Self::Active { session, resumed_at } => {
                session.active_seconds.saturating_add(seconds_between(*resumed_at, now))
            },
        }
    }
}

/// Change queued for the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PendingOperation {
    Create { session: ReadingSession },
    Update { session: ReadingSession },
    Delete { id: Uuid },
}

impl PendingOperation {
    pub const fn session_id(&self) -> Uuid {
        match self {
            Self::Create { session } | Self::Update { session } => session.id,
            Self::Delete { id } => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Start { book_id: String, start_page: u32 },
    Pause,
    Resume,
    Finish { end_page: u32 },
}

impl Action {
    const fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Finish { .. } => "finish",
        }
    }
}

/// Apply `action` at `now`. Returns the next state and the operation to
/// queue; the input state is left untouched on error.
pub(crate) fn transition(
    state: &TrackerState,
    action: Action,
    now: DateTime<Utc>,
) -> Result<(TrackerState, PendingOperation), ValidationFailure> {
    match (state, action) {
        (TrackerState::Idle, Action::Start { book_id, start_page }) => {
            if book_id.trim().is_empty() {
                return Err(ValidationFailure::field("book_id", "must not be empty"));
            }
            let session = ReadingSession::start(book_id, start_page, now);
            let op = PendingOperation::Create { session: session.clone() };
            Ok((TrackerState::Active { session, resumed_at: now }, op))
        },
        (TrackerState::Active { session, resumed_at }, Action::Pause) => {
            let mut session = session.clone();
            session.active_seconds =
                session.active_seconds.saturating_add(seconds_between(*resumed_at, now));
            session.status = ReadingSessionStatus::Paused;
            session.paused_at = Some(now);
            let op = PendingOperation::Update { session: session.clone() };
            Ok((TrackerState::Paused { session }, op))
        },
        (TrackerState::Paused { session }, Action::Resume) => {
            let mut session = session.clone();
            session.status = ReadingSessionStatus::Active;
            session.paused_at = None;
            let op = PendingOperation::Update { session: session.clone() };
            Ok((TrackerState::Active { session, resumed_at: now }, op))
        },
        (
            TrackerState::Active { session, .. } | TrackerState::Paused { session },
            Action::Finish { end_page },
        ) => {
            if end_page < session.start_page {
                return Err(ValidationFailure::field(
                    "end_page",
                    format!("must not be before the start page ({})", session.start_page),
                ));
            }
            let mut session = session.clone();
            session.active_seconds = state.active_seconds_at(now);
            session.status = ReadingSessionStatus::Finished;
            session.paused_at = None;
            session.ended_at = Some(now);
            session.end_page = Some(end_page);
            Ok((TrackerState::Idle, PendingOperation::Update { session }))
        },
        (state, action) => Err(ValidationFailure::InvalidTransition {
            from: state.name().to_string(),
            action: action.name().to_string(),
        }),
    }
}

/// Whole seconds from `from` to `to`; 0 if the clock went backwards.
fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_seconds()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T20:00:00Z")
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|e| panic!("bad fixture: {e}"))
    }

    fn apply(state: &TrackerState, action: Action, now: DateTime<Utc>) -> TrackerState {
        transition(state, action, now).map(|(s, _)| s).unwrap_or_else(|e| panic!("{e}"))
    }

    fn start() -> Action {
        Action::Start { book_id: "b1".to_string(), start_page: 10 }
    }

    #[test]
    fn test_pauses_are_not_counted() {
        let active = apply(&TrackerState::Idle, start(), t0());
        let paused = apply(&active, Action::Pause, t0() + Duration::minutes(10));
        assert_eq!(paused.active_seconds_at(t0() + Duration::hours(5)), 600);

        let resumed = apply(&paused, Action::Resume, t0() + Duration::minutes(30));
        assert_eq!(resumed.active_seconds_at(t0() + Duration::minutes(35)), 900);

        let (idle, op) =
            transition(&resumed, Action::Finish { end_page: 42 }, t0() + Duration::minutes(40))
                .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(idle, TrackerState::Idle);
        let PendingOperation::Update { session } = op else { panic!("expected update") };
        assert_eq!(session.active_seconds, 1200);
        assert_eq!(session.pages_read(), 32);
        assert_eq!(session.status, ReadingSessionStatus::Finished);
        assert!(session.paused_at.is_none());
    }

    #[test]
    fn test_finish_from_paused() {
        let active = apply(&TrackerState::Idle, start(), t0());
        let paused = apply(&active, Action::Pause, t0() + Duration::minutes(5));
        let (_, op) = transition(&paused, Action::Finish { end_page: 20 }, t0() + Duration::hours(1))
            .unwrap_or_else(|e| panic!("{e}"));
        let PendingOperation::Update { session } = op else { panic!("expected update") };
        assert_eq!(session.active_seconds, 300);
        assert_eq!(session.ended_at, Some(t0() + Duration::hours(1)));
    }

    #[test]
    fn test_invalid_transitions() {
        let err = transition(&TrackerState::Idle, Action::Pause, t0()).err();
        assert_eq!(
            err,
            Some(ValidationFailure::InvalidTransition {
                from: "idle".to_string(),
                action: "pause".to_string()
            })
        );

        let active = apply(&TrackerState::Idle, start(), t0());
        assert!(transition(&active, start(), t0()).is_err());
        assert!(transition(&active, Action::Resume, t0()).is_err());

        let paused = apply(&active, Action::Pause, t0());
        assert!(transition(&paused, Action::Pause, t0()).is_err());
        assert!(transition(&TrackerState::Idle, Action::Finish { end_page: 1 }, t0()).is_err());
    }

    #[test]
    fn test_end_page_before_start_is_rejected() {
        let active = apply(&TrackerState::Idle, start(), t0());
        let err = transition(&active, Action::Finish { end_page: 9 }, t0()).err();
        assert!(matches!(err, Some(ValidationFailure::Field { ref field, .. }) if field == "end_page"));
    }

    #[test]
    fn test_clock_skew_does_not_underflow() {
        let active = apply(&TrackerState::Idle, start(), t0());
        let paused = apply(&active, Action::Pause, t0() - Duration::minutes(3));
        assert_eq!(paused.active_seconds_at(t0()), 0);
    }

    #[test]
    fn test_state_persists_as_tagged_json() {
        let active = apply(&TrackerState::Idle, start(), t0());
        let json = serde_json::to_value(&active).unwrap_or_default();
        assert_eq!(json["state"], "active");
        let back: TrackerState = serde_json::from_value(json).unwrap_or_default();
        assert_eq!(back, active);
    }
}
